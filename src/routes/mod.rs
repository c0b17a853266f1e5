//! Page routes of the City Buddies front end
//!
//! A declarative table of the pages, the redirects applied when a page is
//! opened from a direct link, and (in [`title`]) the page title each
//! resolved route gets. Nothing here touches a UI; resolution is pure and
//! only the title of a `targetId` route needs a label lookup.

pub mod title;

pub use title::{format_title, page_title, title_source, LabelLookup, TitleSource, BRAND};

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TARGET_LABEL: &str = "targetLabel";
pub const TARGET_ID: &str = "targetId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteName {
    Home,
    Search,
    Disambiguation,
    CityNotFound,
    Match,
    MatchRedirect,
    About,
    #[serde(rename = "404")]
    NotFound,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "home",
            RouteName::Search => "search",
            RouteName::Disambiguation => "disambiguation",
            RouteName::CityNotFound => "city-not-found",
            RouteName::Match => "match",
            RouteName::MatchRedirect => "match-redirect",
            RouteName::About => "about",
            RouteName::NotFound => "404",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROUTES
            .iter()
            .map(|r| r.name)
            .chain(std::iter::once(RouteName::NotFound))
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown route: {}", s))
    }
}

/// Per-route page metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    /// Title used when no route parameter provides one
    pub title: Option<&'static str>,
    /// Show only the site name
    pub no_title: bool,
}

/// One entry of the route table
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub name: RouteName,
    /// `/`-separated segments; `:name` segments capture a parameter
    pub path: &'static str,
    pub meta: RouteMeta,
    /// Where a direct link to this page is sent instead
    pub redirect: Option<RouteName>,
}

impl Route {
    fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Capture parameters if `segments` match this route's pattern
    fn capture(&self, segments: &[&str]) -> Option<IndexMap<String, String>> {
        if self.segments().count() != segments.len() {
            return None;
        }

        let mut params = IndexMap::new();
        for (pattern, actual) in self.segments().zip(segments) {
            match pattern.strip_prefix(':') {
                Some(param) => {
                    let value = percent_decode_str(actual).decode_utf8_lossy().into_owned();
                    params.insert(param.to_string(), value);
                }
                None if pattern == *actual => {}
                None => return None,
            }
        }
        Some(params)
    }
}

const fn meta(title: Option<&'static str>, no_title: bool) -> RouteMeta {
    RouteMeta { title, no_title }
}

/// The site's pages. Anything unmatched resolves to [`NOT_FOUND`].
pub const ROUTES: &[Route] = &[
    Route { name: RouteName::Home, path: "/", meta: meta(Some("Home"), false), redirect: None },
    Route { name: RouteName::Search, path: "/search/:targetLabel", meta: meta(None, false), redirect: None },
    Route {
        name: RouteName::Disambiguation,
        path: "/disambiguation/:targetLabel",
        meta: meta(None, false),
        redirect: Some(RouteName::Search),
    },
    Route {
        name: RouteName::CityNotFound,
        path: "/city-not-found/:targetLabel",
        meta: meta(None, false),
        redirect: Some(RouteName::Search),
    },
    Route {
        name: RouteName::Match,
        path: "/match/:targetId",
        meta: meta(None, false),
        redirect: Some(RouteName::MatchRedirect),
    },
    Route { name: RouteName::MatchRedirect, path: "/match-redirect/:targetId", meta: meta(None, true), redirect: None },
    Route { name: RouteName::About, path: "/about", meta: meta(Some("About"), false), redirect: None },
];

pub const NOT_FOUND: Route = Route {
    name: RouteName::NotFound,
    path: "/:catchAll",
    meta: meta(Some("404"), false),
    redirect: None,
};

pub fn route(name: RouteName) -> &'static Route {
    ROUTES.iter().find(|r| r.name == name).unwrap_or(&NOT_FOUND)
}

/// A route with its captured parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub name: RouteName,
    pub params: IndexMap<String, String>,
    /// Set when a direct-link redirect was followed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<RouteName>,
}

impl ResolvedRoute {
    pub fn meta(&self) -> RouteMeta {
        route(self.name).meta
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// URL path of this route with its parameters filled in
    pub fn path(&self) -> String {
        let segments: Vec<String> = route(self.name)
            .segments()
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => self.param(param).unwrap_or_default().to_string(),
                None => segment.to_string(),
            })
            .collect();
        format!("/{}", segments.join("/"))
    }
}

/// Resolve a URL opened directly (typed, bookmarked, reloaded).
///
/// Query string and fragment are ignored. Pages that only make sense
/// after in-app navigation redirect, carrying their parameters along.
pub fn resolve_path(path: &str) -> ResolvedRoute {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    for route in ROUTES {
        if let Some(params) = route.capture(&segments) {
            return match route.redirect {
                Some(target) => ResolvedRoute {
                    name: target,
                    params,
                    redirected_from: Some(route.name),
                },
                None => ResolvedRoute {
                    name: route.name,
                    params,
                    redirected_from: None,
                },
            };
        }
    }

    let mut params = IndexMap::new();
    params.insert("catchAll".to_string(), segments.join("/"));
    ResolvedRoute {
        name: RouteName::NotFound,
        params,
        redirected_from: None,
    }
}

/// Resolve in-app navigation to a named route; no redirect applies.
pub fn resolve_named<I, K, V>(name: RouteName, params: I) -> ResolvedRoute
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    ResolvedRoute {
        name,
        params: params.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        redirected_from: None,
    }
}
