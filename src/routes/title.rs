//! Page titles for resolved routes

use async_trait::async_trait;
use tracing::warn;

use super::{ResolvedRoute, TARGET_ID, TARGET_LABEL};
use crate::cities::{CityBuddies, CityResult, EntityId};

/// Site name, shown alone or after the page title
pub const BRAND: &str = "City Buddies";

/// Where a route's title comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleSource {
    /// Only the site name
    Brand,
    /// The `targetLabel` parameter as typed by the user
    Param(String),
    /// The label of the `targetId` entity
    LabelOf(String),
    /// The route's fixed title
    Fixed(&'static str),
}

/// Decide a route's title source without doing any lookup
pub fn title_source(route: &ResolvedRoute) -> TitleSource {
    let meta = route.meta();
    if meta.no_title {
        return TitleSource::Brand;
    }
    if let Some(label) = route.param(TARGET_LABEL) {
        return TitleSource::Param(label.to_string());
    }
    if let Some(id) = route.param(TARGET_ID) {
        return TitleSource::LabelOf(id.to_string());
    }
    match meta.title {
        Some(title) => TitleSource::Fixed(title),
        None => TitleSource::Brand,
    }
}

/// `"<title> | City Buddies"`, or just the site name
pub fn format_title(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("{} | {}", title, BRAND),
        _ => BRAND.to_string(),
    }
}

/// Anything that can turn an entity ID into a label
#[async_trait]
pub trait LabelLookup: Send + Sync {
    async fn label(&self, id: &EntityId) -> CityResult<String>;
}

#[async_trait]
impl LabelLookup for CityBuddies {
    async fn label(&self, id: &EntityId) -> CityResult<String> {
        self.id_to_label(id).await
    }
}

/// Full page title for `route`.
///
/// A failed label lookup degrades to the site name.
pub async fn page_title(route: &ResolvedRoute, lookup: &dyn LabelLookup) -> String {
    match title_source(route) {
        TitleSource::Brand => format_title(None),
        TitleSource::Param(label) => format_title(Some(&label)),
        TitleSource::Fixed(title) => format_title(Some(title)),
        TitleSource::LabelOf(raw) => {
            let label = match raw.parse::<EntityId>() {
                Ok(id) => lookup.label(&id).await,
                Err(e) => Err(e),
            };
            match label {
                Ok(label) => format_title(Some(&label)),
                Err(e) => {
                    warn!("No title for {} ({}): {}", route.name, raw, e);
                    format_title(None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::CityError;
    use crate::routes::{resolve_named, resolve_path, RouteName};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Labels {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LabelLookup for Labels {
        async fn label(&self, id: &EntityId) -> CityResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match id.as_str() {
                "Q60" => Ok("New York City".to_string()),
                other => Err(CityError::NotFound(other.to_string())),
            }
        }
    }

    fn labels() -> Labels {
        Labels { calls: AtomicUsize::new(0) }
    }

    #[test]
    fn test_title_sources() {
        assert_eq!(title_source(&resolve_path("/")), TitleSource::Fixed("Home"));
        assert_eq!(title_source(&resolve_path("/about")), TitleSource::Fixed("About"));
        assert_eq!(title_source(&resolve_path("/unknown")), TitleSource::Fixed("404"));
        assert_eq!(
            title_source(&resolve_path("/search/Lisbon")),
            TitleSource::Param("Lisbon".to_string())
        );
        assert_eq!(
            title_source(&resolve_named(RouteName::Match, [("targetId", "Q60")])),
            TitleSource::LabelOf("Q60".to_string())
        );
        // direct /match links land on match-redirect, which has no title
        assert_eq!(title_source(&resolve_path("/match/Q60")), TitleSource::Brand);
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title(Some("About")), "About | City Buddies");
        assert_eq!(format_title(Some("")), "City Buddies");
        assert_eq!(format_title(None), "City Buddies");
    }

    #[tokio::test]
    async fn test_page_titles() {
        let lookup = labels();

        assert_eq!(page_title(&resolve_path("/"), &lookup).await, "Home | City Buddies");
        assert_eq!(
            page_title(&resolve_path("/disambiguation/Springfield"), &lookup).await,
            "Springfield | City Buddies"
        );
        assert_eq!(page_title(&resolve_path("/match-redirect/Q60"), &lookup).await, "City Buddies");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);

        let route = resolve_named(RouteName::Match, [("targetId", "Q60")]);
        assert_eq!(page_title(&route, &lookup).await, "New York City | City Buddies");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_falls_back_to_brand() {
        let lookup = labels();

        let unknown = resolve_named(RouteName::Match, [("targetId", "Q1")]);
        assert_eq!(page_title(&unknown, &lookup).await, "City Buddies");

        let invalid = resolve_named(RouteName::Match, [("targetId", "not-an-id")]);
        assert_eq!(page_title(&invalid, &lookup).await, "City Buddies");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}
