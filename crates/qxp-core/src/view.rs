//! View selection.
//!
//! Maps a parsed [`Route`] onto the fixed set of pages the site can show.
//! The mapping is a `match` over the first segment, so adding a page means
//! adding a variant here and the compiler points at every host that must
//! render it.

use serde::Serialize;

use crate::route::Route;

/// A page-level view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Home,
    /// Listing of every solution persona.
    SolutionsIndex,
    /// A single solution persona. The slug is passed through unvalidated;
    /// hosts render not-found for slugs missing from the catalog.
    Solution { slug: String },
    Pricing,
    Contact,
    Demo,
    About,
    Testimonials,
    Faq,
    Careers,
    Privacy,
    Terms,
    NotFound,
}

impl View {
    /// Select the view for a route.
    ///
    /// No segments selects [`View::Home`]. A first segment that names no
    /// page selects [`View::NotFound`]; it does not fall back to home.
    #[must_use]
    pub fn select(route: &Route) -> Self {
        let Some(first) = route.first() else {
            return Self::Home;
        };

        match first {
            "solutions" => match route.param() {
                Some(slug) => Self::Solution {
                    slug: slug.to_owned(),
                },
                None => Self::SolutionsIndex,
            },
            "pricing" => Self::Pricing,
            "contact" => Self::Contact,
            "demo" => Self::Demo,
            "about" => Self::About,
            "testimonials" => Self::Testimonials,
            "faq" => Self::Faq,
            "careers" => Self::Careers,
            "privacy" => Self::Privacy,
            "terms" => Self::Terms,
            _ => Self::NotFound,
        }
    }

    /// Stable identifier, matching the serialized `view` tag.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::SolutionsIndex => "solutions_index",
            Self::Solution { .. } => "solution",
            Self::Pricing => "pricing",
            Self::Contact => "contact",
            Self::Demo => "demo",
            Self::About => "about",
            Self::Testimonials => "testimonials",
            Self::Faq => "faq",
            Self::Careers => "careers",
            Self::Privacy => "privacy",
            Self::Terms => "terms",
            Self::NotFound => "not_found",
        }
    }

    /// Canonical fragment for links to this view. Parsing it selects the
    /// same view again, except for [`View::NotFound`], which has no address
    /// of its own and links home.
    #[must_use]
    pub fn fragment(&self) -> String {
        let path = match self {
            Self::Home | Self::NotFound => "",
            Self::SolutionsIndex => "solutions",
            Self::Solution { slug } => return format!("#/solutions/{slug}"),
            Self::Pricing => "pricing",
            Self::Contact => "contact",
            Self::Demo => "demo",
            Self::About => "about",
            Self::Testimonials => "testimonials",
            Self::Faq => "faq",
            Self::Careers => "careers",
            Self::Privacy => "privacy",
            Self::Terms => "terms",
        };
        format!("#/{path}")
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "School management, simplified",
            Self::SolutionsIndex => "Solutions for every role",
            Self::Solution { .. } => "Solution",
            Self::Pricing => "Simple, transparent pricing",
            Self::Contact => "Get in touch",
            Self::Demo => "Book a demo",
            Self::About => "About QXP",
            Self::Testimonials => "What schools say",
            Self::Faq => "Frequently asked questions",
            Self::Careers => "Careers",
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Service",
            Self::NotFound => "Page not found",
        }
    }
}

/// Views addressed by a single fixed segment, in no particular order.
/// [`View::Home`], [`View::Solution`] and [`View::NotFound`] are not listed:
/// they have no segment of their own.
pub const STATIC_PAGES: [View; 10] = [
    View::SolutionsIndex,
    View::Pricing,
    View::Contact,
    View::Demo,
    View::About,
    View::Testimonials,
    View::Faq,
    View::Careers,
    View::Privacy,
    View::Terms,
];

/// An entry in the primary navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

/// Primary navigation, in display order.
pub const NAV: [NavLink; 6] = [
    NavLink {
        label: "Solutions",
        href: "#/solutions",
    },
    NavLink {
        label: "Pricing",
        href: "#/pricing",
    },
    NavLink {
        label: "About",
        href: "#/about",
    },
    NavLink {
        label: "Testimonials",
        href: "#/testimonials",
    },
    NavLink {
        label: "FAQ",
        href: "#/faq",
    },
    NavLink {
        label: "Contact",
        href: "#/contact",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(slug: &str) -> View {
        View::Solution {
            slug: slug.to_owned(),
        }
    }

    fn select(fragment: &str) -> View {
        View::select(&Route::parse(fragment))
    }

    #[test]
    fn empty_fragment_is_home() {
        assert_eq!(select(""), View::Home);
        assert_eq!(select("#/"), View::Home);
        assert_eq!(select("#/marketing"), View::Home);
    }

    #[test]
    fn prefixed_and_plain_fragments_agree() {
        assert_eq!(select("#/marketing/pricing"), View::Pricing);
        assert_eq!(select("#/pricing"), View::Pricing);
    }

    #[test]
    fn solutions_index_and_detail() {
        assert_eq!(select("#/solutions"), View::SolutionsIndex);
        assert_eq!(select("#/solutions/bursar"), solution("bursar"));
        assert_eq!(select("#/solutions/not-a-persona"), solution("not-a-persona"));
    }

    #[test]
    fn every_static_page_is_reachable() {
        let cases = [
            ("#/pricing", View::Pricing),
            ("#/contact", View::Contact),
            ("#/demo", View::Demo),
            ("#/about", View::About),
            ("#/testimonials", View::Testimonials),
            ("#/faq", View::Faq),
            ("#/careers", View::Careers),
            ("#/privacy", View::Privacy),
            ("#/terms", View::Terms),
        ];
        for (fragment, expected) in cases {
            assert_eq!(select(fragment), expected, "{fragment}");
        }
    }

    #[test]
    fn unknown_first_segment_is_not_found_not_home() {
        assert_eq!(select("#/pricingz"), View::NotFound);
        assert_eq!(select("#/marketing/nowhere"), View::NotFound);
        assert_eq!(select("#/Pricing"), View::NotFound);
    }

    #[test]
    fn extra_segments_on_static_pages_are_ignored() {
        assert_eq!(select("#/faq/anything"), View::Faq);
    }

    #[test]
    fn query_does_not_affect_selection() {
        assert_eq!(select("#/demo?persona=bursar"), View::Demo);
    }

    #[test]
    fn canonical_fragments_round_trip() {
        let views = [
            View::Home,
            View::SolutionsIndex,
            solution("parent"),
            View::Pricing,
            View::Contact,
            View::Demo,
            View::About,
            View::Testimonials,
            View::Faq,
            View::Careers,
            View::Privacy,
            View::Terms,
        ];
        for view in views {
            assert_eq!(select(&view.fragment()), view);
        }
        assert_eq!(select(&View::NotFound.fragment()), View::Home);
    }

    #[test]
    fn nav_links_select_their_pages() {
        for link in NAV {
            assert_ne!(select(link.href), View::NotFound, "{}", link.label);
        }
    }

    #[test]
    fn serializes_with_view_tag() {
        let json = serde_json::to_value(solution("bursar")).unwrap();
        assert_eq!(json, serde_json::json!({"view": "solution", "slug": "bursar"}));
        let json = serde_json::to_value(View::NotFound).unwrap();
        assert_eq!(json, serde_json::json!({"view": "not_found"}));
    }

    #[test]
    fn static_pages_select_themselves() {
        for view in STATIC_PAGES {
            assert_eq!(select(&view.fragment()), view, "{}", view.fragment());
            assert_eq!(Route::parse(&view.fragment()).segments.len(), 1);
        }
    }
}
