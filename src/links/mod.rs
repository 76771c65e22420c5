//! HATEOAS link generation
//!
//! Every response body carries a `links` array. It is assembled in a fixed
//! order: the `self` link, the links specific to the resource, the links
//! that are reachable from anywhere, and finally the links that depend on
//! whether the caller is logged in.

use crate::models::Link;

/// Method, path and query of the request being answered
#[derive(Debug, Clone, Copy)]
pub struct RequestTarget<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
}

impl<'a> RequestTarget<'a> {
    pub fn new(method: &'a str, path: &'a str, query: &'a str) -> Self {
        Self {
            method,
            path,
            query,
        }
    }

    /// Path without a trailing slash, `/` stays `/`
    fn route(&self) -> &'a str {
        match self.path.trim_end_matches('/') {
            "" => "/",
            route => route,
        }
    }
}

pub fn self_link(target: &RequestTarget<'_>) -> Link {
    let href = if target.query.is_empty() {
        target.path.to_string()
    } else {
        format!("{}?{}", target.path, target.query)
    };
    Link::new("self", href, target.method)
}

pub fn anime_info_link(anime_id: i32) -> Link {
    Link::new("view-anime-info", format!("/anime/{}", anime_id), "GET")
}

pub fn anime_self_link(anime_id: i32) -> Link {
    Link::new("self", format!("/anime/{}", anime_id), "GET")
}

pub fn add_to_list_link(user_id: i32, anime_id: i32) -> Link {
    Link::new(
        "add-to-list",
        format!("/anime-list/{}/anime/{}", user_id, anime_id),
        "POST",
    )
}

pub fn remove_from_list_link(user_id: i32, anime_id: i32) -> Link {
    Link::new(
        "remove-from-list",
        format!("/anime-list/{}/anime/{}", user_id, anime_id),
        "DELETE",
    )
}

pub fn login_link() -> Link {
    Link::new("login", "/auth/login", "POST")
}

pub fn register_link() -> Link {
    Link::new("register", "/user/register", "POST")
}

/// Link to a user's anime list under the given relation
pub fn anime_list_link(user_id: i32, rel: &str) -> Link {
    Link::new(rel, format!("/anime-list/{}", user_id), "GET")
}

pub fn profile_link(user_id: i32) -> Link {
    anime_list_link(user_id, "profile")
}

pub fn owner_link(owner_id: i32) -> Link {
    anime_list_link(owner_id, "owner")
}

pub fn anime_lists_link() -> Link {
    Link::new("animelists", "/anime-list{?page}", "GET")
}

pub fn anime_link() -> Link {
    Link::new("anime", "/anime{?page}", "GET")
}

pub fn search_anime_link() -> Link {
    Link::new("search-anime", "/anime/search{?title,page}", "GET")
}

pub fn update_username_link() -> Link {
    Link::new("update-username", "/user/username", "PUT")
}

pub fn refresh_login_link() -> Link {
    Link::new("refresh-login", "/auth/refresh", "POST")
}

pub fn docs_link() -> Link {
    Link::new("documentation", "/api-docs", "GET")
}

pub fn subscribe_link(owner_id: i32) -> Link {
    Link::new(
        "subscribe",
        format!("/webhook/anime-list/{}/subscribe", owner_id),
        "POST",
    )
}

pub fn unsubscribe_link(owner_id: i32) -> Link {
    Link::new(
        "unsubscribe",
        format!("/webhook/anime-list/{}/subscribe", owner_id),
        "DELETE",
    )
}

/// Append `page=n` to a path that may already carry a query string
pub fn page_href(base: &str, page: i64) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base, separator, page)
}

/// Page numbers for `next` and `previous`, clamped to `1..=total_pages`
pub fn adjacent_pages(page: i64, total_pages: i64) -> (i64, i64) {
    let next = if page < total_pages { page + 1 } else { page };
    let previous = if page > 1 { page - 1 } else { page };
    (next, previous)
}

/// `next` and `previous` links for a paginated collection
pub fn page_links(base: &str, page: i64, total_pages: i64) -> Vec<Link> {
    let (next, previous) = adjacent_pages(page, total_pages);
    vec![
        Link::new("next", page_href(base, next), "GET"),
        Link::new("previous", page_href(base, previous), "GET"),
    ]
}

/// Links reachable from anywhere, minus the one for the current collection
pub fn always_accessible_links(target: &RequestTarget<'_>) -> Vec<Link> {
    let route = target.route();
    let mut links = Vec::with_capacity(3);

    if route != "/anime/search" {
        links.push(search_anime_link());
    }
    if route != "/anime" {
        links.push(anime_link());
    }
    if route != "/anime-list" {
        links.push(anime_lists_link());
    }

    links
}

/// Links depending on login state
pub fn auth_links(target: &RequestTarget<'_>, user_id: Option<i32>) -> Vec<Link> {
    let Some(user_id) = user_id else {
        return vec![login_link()];
    };

    let route = target.route();
    let mut links = vec![profile_link(user_id)];
    if route != "/user/username" {
        links.push(update_username_link());
    }
    if route != "/auth/refresh" {
        links.push(refresh_login_link());
    }
    links
}

/// Full `links` array for a response
pub fn response_links(
    target: &RequestTarget<'_>,
    specific: Vec<Link>,
    user_id: Option<i32>,
) -> Vec<Link> {
    let mut links = Vec::with_capacity(specific.len() + 7);
    links.push(self_link(target));
    links.extend(specific);
    links.extend(always_accessible_links(target));
    links.extend(auth_links(target, user_id));
    links
}

/// Links advertised by the API entry point
pub fn entry_point_links() -> Vec<Link> {
    let root = RequestTarget::new("GET", "/", "");
    let mut links = vec![self_link(&root)];
    links.extend(always_accessible_links(&root));
    links.extend([register_link(), login_link(), docs_link()]);
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rels(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.rel.as_str()).collect()
    }

    #[test]
    fn test_self_link_includes_query() {
        let target = RequestTarget::new("GET", "/anime", "page=3");
        assert_eq!(self_link(&target), Link::new("self", "/anime?page=3", "GET"));

        let target = RequestTarget::new("PUT", "/user/username", "");
        assert_eq!(self_link(&target), Link::new("self", "/user/username", "PUT"));
    }

    #[test]
    fn test_always_accessible_links_omit_current_collection() {
        let on_anime = always_accessible_links(&RequestTarget::new("GET", "/anime", ""));
        assert_eq!(rels(&on_anime), vec!["search-anime", "animelists"]);

        let on_search = always_accessible_links(&RequestTarget::new("GET", "/anime/search", "title=x"));
        assert_eq!(rels(&on_search), vec!["anime", "animelists"]);

        let on_lists = always_accessible_links(&RequestTarget::new("GET", "/anime-list/", ""));
        assert_eq!(rels(&on_lists), vec!["search-anime", "anime"]);

        let elsewhere = always_accessible_links(&RequestTarget::new("GET", "/anime/5", ""));
        assert_eq!(rels(&elsewhere), vec!["search-anime", "anime", "animelists"]);
    }

    #[test]
    fn test_auth_links_anonymous() {
        let links = auth_links(&RequestTarget::new("GET", "/anime", ""), None);
        assert_eq!(links, vec![login_link()]);
    }

    #[test]
    fn test_auth_links_logged_in() {
        let links = auth_links(&RequestTarget::new("GET", "/anime", ""), Some(9));
        assert_eq!(rels(&links), vec!["profile", "update-username", "refresh-login"]);
        assert_eq!(links[0].href, "/anime-list/9");

        let links = auth_links(&RequestTarget::new("PUT", "/user/username", ""), Some(9));
        assert_eq!(rels(&links), vec!["profile", "refresh-login"]);

        let links = auth_links(&RequestTarget::new("POST", "/auth/refresh", ""), Some(9));
        assert_eq!(rels(&links), vec!["profile", "update-username"]);
    }

    #[test]
    fn test_response_links_order() {
        let target = RequestTarget::new("GET", "/anime", "page=2");
        let links = response_links(&target, page_links("/anime", 2, 5), None);
        assert_eq!(
            rels(&links),
            vec!["self", "next", "previous", "search-anime", "animelists", "login"]
        );
    }

    #[test]
    fn test_page_links_middle_page() {
        let links = page_links("/anime", 3, 5);
        assert_eq!(links[0], Link::new("next", "/anime?page=4", "GET"));
        assert_eq!(links[1], Link::new("previous", "/anime?page=2", "GET"));
    }

    #[test]
    fn test_page_links_bounds() {
        let first = page_links("/anime", 1, 5);
        assert_eq!(first[1].href, "/anime?page=1");

        let last = page_links("/anime", 5, 5);
        assert_eq!(last[0].href, "/anime?page=5");

        let empty = page_links("/anime", 1, 0);
        assert_eq!(empty[0].href, "/anime?page=1");
        assert_eq!(empty[1].href, "/anime?page=1");
    }

    #[test]
    fn test_page_href_keeps_existing_query() {
        assert_eq!(
            page_href("/anime/search?title=naruto", 2),
            "/anime/search?title=naruto&page=2"
        );
    }

    #[test]
    fn test_entry_point_links() {
        let links = entry_point_links();
        assert_eq!(
            rels(&links),
            vec![
                "self",
                "search-anime",
                "anime",
                "animelists",
                "register",
                "login",
                "documentation"
            ]
        );
        assert_eq!(links[0].href, "/");
    }

    #[test]
    fn test_list_item_links() {
        assert_eq!(add_to_list_link(4, 19).href, "/anime-list/4/anime/19");
        assert_eq!(remove_from_list_link(4, 19).method, "DELETE");
        assert_eq!(subscribe_link(4).href, "/webhook/anime-list/4/subscribe");
        assert_eq!(unsubscribe_link(4).method, "DELETE");
    }

    proptest! {
        /// Adjacent pages never leave `1..=max(total, page)` and move by at most one
        #[test]
        fn property_adjacent_pages_stay_in_range(
            total in 0i64..10_000,
            page in 1i64..10_000,
        ) {
            let (next, previous) = adjacent_pages(page, total);

            prop_assert!(next >= page && next - page <= 1);
            prop_assert!(previous <= page && page - previous <= 1);
            prop_assert!(previous >= 1);
            if page < total {
                prop_assert_eq!(next, page + 1);
            } else {
                prop_assert_eq!(next, page);
            }
        }

        /// Every generated page href is well formed
        #[test]
        fn property_page_href_is_well_formed(
            endpoint in "[a-z-]{1,12}",
            page in 1i64..10_000,
            total in 0i64..10_000,
        ) {
            let base = format!("/{}", endpoint);
            let prefix = format!("{}?page=", base);
            for link in page_links(&base, page, total) {
                prop_assert!(link.href.starts_with(&prefix));
                let n: i64 = link.href.rsplit('=').next().unwrap().parse().unwrap();
                prop_assert!(n >= 1);
            }
        }

        /// The self link always comes first and login state decides the trailing links
        #[test]
        fn property_response_links_shape(
            path in "/[a-z-]{0,12}",
            user in proptest::option::of(1i32..1_000_000),
        ) {
            let target = RequestTarget::new("GET", &path, "");
            let links = response_links(&target, Vec::new(), user);

            prop_assert_eq!(links[0].rel.as_str(), "self");
            let has_login = links.iter().any(|l| l.rel == "login");
            let has_profile = links.iter().any(|l| l.rel == "profile");
            prop_assert_eq!(has_login, user.is_none());
            prop_assert_eq!(has_profile, user.is_some());
        }
    }
}
