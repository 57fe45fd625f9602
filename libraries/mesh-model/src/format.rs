use crate::model::LoadError;
use std::path::Path;

/// The closed set of supported model file formats, resolved once from the
/// asset path before any I/O happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Gltf,
    Stl,
    Obj,
}

impl ModelFormat {
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for any extension other
    /// than `gltf`, `glb`, `stl` or `obj` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "gltf" | "glb" => Ok(Self::Gltf),
            "stl" => Ok(Self::Stl),
            "obj" => Ok(Self::Obj),
            _ => Err(LoadError::UnsupportedFormat { extension }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_resolve() {
        assert_eq!(
            ModelFormat::from_path(Path::new("a/b/holder.glb")).unwrap(),
            ModelFormat::Gltf
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("scene.GLTF")).unwrap(),
            ModelFormat::Gltf
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("bracket.Stl")).unwrap(),
            ModelFormat::Stl
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("seat.obj")).unwrap(),
            ModelFormat::Obj
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let error = ModelFormat::from_path(Path::new("model.fbx")).unwrap_err();
        assert!(matches!(
            error,
            LoadError::UnsupportedFormat { ref extension } if extension == "fbx"
        ));
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert!(ModelFormat::from_path(Path::new("model")).is_err());
    }
}
