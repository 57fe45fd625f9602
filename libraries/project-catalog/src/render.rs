//! Turns parsed project records into card markup.
//!
//! The output mirrors the static page's structure: a row of filter
//! buttons, then one `<article>` card per project, newest first. Cards
//! past the first three mark their hero image for lazy loading.

use crate::markup::{Element, Node};
use crate::model::{Catalog, Category, LogEntry, Project, ProjectKind};
use chrono::NaiveDate;
use log::info;

/// Hero images rendered eagerly before lazy loading kicks in.
const EAGER_IMAGE_COUNT: usize = 3;

/// `2024-03-01` becomes `March 2024`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// The markup of both catalog sections, ready for inclusion in a page.
pub struct RenderedCatalog {
    pub filters: String,
    pub grid: String,
}

/// Renders the whole catalog. The caller signals completion to whoever
/// consumes the markup afterwards.
#[must_use]
pub fn render(catalog: &Catalog) -> RenderedCatalog {
    let filters = filter_buttons(&catalog.categories).to_html();
    let grid = project_grid(&catalog.projects)
        .iter()
        .map(Node::to_html)
        .collect();
    info!("rendered {} project cards", catalog.projects.len());
    RenderedCatalog { filters, grid }
}

/// An `All` button followed by one button per category.
#[must_use]
pub fn filter_buttons(categories: &[Category]) -> Node {
    let mut container = Element::new("div").attr("class", "filter-buttons").child(
        Element::new("button")
            .attr("class", "filter-btn active")
            .attr("data-filter", "all")
            .text("All"),
    );
    for category in categories {
        container = container.child(
            Element::new("button")
                .attr("class", "filter-btn")
                .attr("data-filter", &category.id)
                .text(&category.label),
        );
    }
    container.into()
}

/// One card per project, sorted by date descending.
#[must_use]
pub fn project_grid(projects: &[Project]) -> Vec<Node> {
    let mut ordered: Vec<&Project> = projects.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    ordered
        .iter()
        .enumerate()
        .map(|(index, project)| card(project, index >= EAGER_IMAGE_COUNT))
        .collect()
}

/// Shown in place of the grid when the data cannot be loaded.
#[must_use]
pub fn unable_to_load() -> Node {
    Element::new("p")
        .attr("class", "projects-error")
        .text("Unable to load projects.")
        .into()
}

fn card(project: &Project, lazy: bool) -> Node {
    let class = match project.kind {
        ProjectKind::Single => "project-card",
        ProjectKind::Log => "project-card project-card--log",
    };
    let mut article = Element::new("article")
        .attr("class", class)
        .attr("data-category", &project.category)
        .attr("data-date", project.date.to_string())
        .child(
            Element::new("div")
                .attr("class", "project-image")
                .child(hero_image(project, lazy)),
        );

    let mut content = Element::new("div")
        .attr("class", "project-content")
        .child(
            Element::new("span")
                .attr("class", "project-date")
                .text(format_date(project.date)),
        )
        .child(
            Element::new("h3")
                .attr("class", "project-title")
                .text(&project.title),
        )
        .child(
            Element::new("p")
                .attr("class", "project-description")
                .text(&project.description),
        )
        .children(tags(&project.tags));

    match project.kind {
        ProjectKind::Single => {
            if let Some(video) = &project.video {
                content = content.child(video_placeholder(video, None));
            }
            article = article.child(content);
        }
        ProjectKind::Log => {
            content = content.child(
                Element::new("button")
                    .attr("class", "project-log-toggle")
                    .attr("aria-expanded", "false")
                    .text("View Build Log ")
                    .child(
                        Element::new("span")
                            .attr("class", "toggle-indicator")
                            .text("[+]"),
                    ),
            );
            article = article.child(content).child(
                Element::new("div")
                    .attr("class", "project-log")
                    .flag("hidden")
                    .children(project.entries.iter().map(log_entry)),
            );
        }
    }

    article.into()
}

fn hero_image(project: &Project, lazy: bool) -> Element {
    let mut image = Element::new("img")
        .attr("src", &project.hero.src)
        .attr("alt", &project.hero.alt);
    if lazy {
        image = image.attr("loading", "lazy");
    }
    image.attr("width", "1600").attr("height", "1000")
}

fn tags(tags: &[String]) -> Option<Node> {
    if tags.is_empty() {
        return None;
    }
    Some(
        Element::new("div")
            .attr("class", "project-tags")
            .children(
                tags.iter()
                    .map(|tag| Element::new("span").attr("class", "tag").text(tag).into()),
            )
            .into(),
    )
}

fn log_entry(entry: &LogEntry) -> Node {
    match entry {
        LogEntry::Image { src, alt, caption } => {
            let mut node = Element::new("div").attr("class", "log-entry").child(
                Element::new("img")
                    .attr("src", src)
                    .attr("alt", alt)
                    .attr("loading", "lazy")
                    .attr("width", "1200")
                    .attr("height", "750"),
            );
            if let Some(caption) = caption {
                node = node.child(caption_node(caption));
            }
            node.into()
        }
        LogEntry::Video {
            src,
            alt: _,
            caption,
            poster,
        } => {
            let media = if is_embed(src) {
                video_placeholder(src, poster.as_deref())
            } else {
                self_hosted_video(src, poster.as_deref())
            };
            let mut node = Element::new("div")
                .attr("class", "log-entry log-entry--video")
                .child(media);
            if let Some(caption) = caption {
                node = node.child(caption_node(caption));
            }
            node.into()
        }
    }
}

fn caption_node(caption: &str) -> Node {
    Element::new("p")
        .attr("class", "log-caption")
        .text(caption)
        .into()
}

/// Hosted platforms get a click-to-load placeholder instead of an eager
/// iframe, so nothing is fetched until the user asks for it.
fn is_embed(src: &str) -> bool {
    src.contains("youtube") || src.contains("vimeo") || src.contains("embed")
}

fn video_placeholder(src: &str, poster: Option<&str>) -> Node {
    let mut placeholder = Element::new("div")
        .attr("class", "video-placeholder")
        .attr("data-src", src);
    if let Some(poster) = poster {
        placeholder = placeholder.child(
            Element::new("img")
                .attr("src", poster)
                .attr("loading", "lazy"),
        );
    }
    placeholder = placeholder.child(
        Element::new("button")
            .attr("class", "video-play-btn")
            .attr("aria-label", "Play video")
            .text("\u{25b6}"),
    );
    Element::new("div")
        .attr("class", "video-wrapper")
        .child(placeholder)
        .into()
}

fn self_hosted_video(src: &str, poster: Option<&str>) -> Node {
    let mut video = Element::new("video")
        .flag("controls")
        .attr("preload", "none");
    if let Some(poster) = poster {
        video = video.attr("poster", poster);
    }
    video = video
        .attr("width", "1200")
        .attr("height", "675")
        .child(
            Element::new("source")
                .attr("src", src)
                .attr("type", "video/mp4"),
        );
    Element::new("div")
        .attr("class", "video-wrapper")
        .child(video)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        serde_json::from_str(
            r#"{
                "categories": [{"id": "robotics", "label": "Robotics"}],
                "projects": [{
                    "category": "robotics",
                    "date": "2024-03-01",
                    "title": "X",
                    "description": "Y",
                    "tags": ["a"],
                    "hero": {"src": "/i.png", "alt": "Z"}
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn sample_data_renders_one_card_with_category_title_and_date() {
        let rendered = render(&sample_catalog());
        assert_eq!(rendered.grid.matches("<article").count(), 1);
        assert!(rendered.grid.contains("data-category=\"robotics\""));
        assert!(rendered.grid.contains(">X</h3>"));
        assert!(rendered.grid.contains(">March 2024</span>"));
    }

    #[test]
    fn cards_render_newest_first() {
        let mut catalog = sample_catalog();
        let mut older = catalog.projects[0].clone();
        older.date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        older.title = "Old".into();
        let mut newer = catalog.projects[0].clone();
        newer.date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        newer.title = "New".into();
        catalog.projects = vec![older, newer];

        let rendered = render(&catalog);
        let new_at = rendered.grid.find(">New<").unwrap();
        let old_at = rendered.grid.find(">Old<").unwrap();
        assert!(new_at < old_at, "2024 card must precede 2023 card");
    }

    #[test]
    fn only_cards_past_the_first_three_lazy_load() {
        let template = &sample_catalog().projects[0];
        let projects: Vec<Project> = (0..5)
            .map(|month| {
                let mut project = template.clone();
                project.date = NaiveDate::from_ymd_opt(2024, month + 1, 1).unwrap();
                project
            })
            .collect();

        let cards = project_grid(&projects);
        for (index, card) in cards.iter().enumerate() {
            let html = card.to_html();
            assert_eq!(html.contains("loading=\"lazy\""), index >= 3, "card {index}");
        }
    }

    #[test]
    fn filter_buttons_start_with_all_active() {
        let html = filter_buttons(&sample_catalog().categories).to_html();
        assert!(html.starts_with("<div class=\"filter-buttons\">"));
        assert!(html.contains("class=\"filter-btn active\" data-filter=\"all\""));
        assert!(html.contains("data-filter=\"robotics\">Robotics<"));
    }

    #[test]
    fn titles_are_escaped_in_the_output() {
        let mut catalog = sample_catalog();
        catalog.projects[0].title = "<b>bold</b> & strong".into();
        let rendered = render(&catalog);
        assert!(rendered.grid.contains("&lt;b&gt;bold&lt;/b&gt; &amp; strong"));
        assert!(!rendered.grid.contains("<b>bold</b>"));
    }

    #[test]
    fn hosted_platform_videos_become_click_to_load_placeholders() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"type": "video", "src": "https://youtube.com/embed/42", "poster": "/p.png"}"#,
        )
        .unwrap();
        let html = log_entry(&entry).to_html();
        assert!(html.contains("video-placeholder"));
        assert!(html.contains("data-src=\"https://youtube.com/embed/42\""));
        assert!(!html.contains("<video"));
    }

    #[test]
    fn self_hosted_videos_render_a_video_tag() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"type": "video", "src": "/clips/demo.mp4", "caption": "First drive"}"#,
        )
        .unwrap();
        let html = log_entry(&entry).to_html();
        assert!(html.contains("<video controls preload=\"none\""));
        assert!(html.contains("<source src=\"/clips/demo.mp4\" type=\"video/mp4\">"));
        assert!(html.contains(">First drive</p>"));
    }

    #[test]
    fn log_cards_carry_a_collapsed_build_log() {
        let mut catalog = sample_catalog();
        catalog.projects[0].kind = ProjectKind::Log;
        catalog.projects[0].entries = vec![serde_json::from_str(
            r#"{"type": "image", "src": "/1.png", "alt": "frame"}"#,
        )
        .unwrap()];

        let rendered = render(&catalog);
        assert!(rendered.grid.contains("project-card--log"));
        assert!(rendered.grid.contains("aria-expanded=\"false\""));
        assert!(rendered.grid.contains("<div class=\"project-log\" hidden>"));
    }
}
