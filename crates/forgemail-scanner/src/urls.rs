//! URL construction for the platform's web pages and API service.

use forgemail_core::{Handle, PlatformConfig, Relation};

/// Builds the URLs every strategy fetches.
#[derive(Debug, Clone)]
pub struct Endpoints {
    web_base: String,
    api_base: String,
}

impl Endpoints {
    /// Build from the platform configuration. Trailing slashes on the
    /// base URLs are tolerated.
    #[must_use]
    pub fn new(platform: &PlatformConfig) -> Self {
        Self {
            web_base: platform.web_base.trim_end_matches('/').to_string(),
            api_base: platform.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Structured profile metadata for an account.
    #[must_use]
    pub fn metadata(&self, account: &Handle) -> String {
        format!("{}/users/{}", self.api_base, account)
    }

    /// Human-facing profile page for an account.
    #[must_use]
    pub fn profile(&self, account: &Handle) -> String {
        format!("{}/{}", self.web_base, account)
    }

    /// Owned repositories for an account, most recently updated first.
    #[must_use]
    pub fn repositories(&self, account: &Handle) -> String {
        format!(
            "{}/users/{}/repos?type=owner&sort=updated",
            self.api_base, account
        )
    }

    /// Commit history for a repository's full name (`owner/repo`).
    #[must_use]
    pub fn commits(&self, full_name: &str) -> String {
        format!("{}/repos/{}/commits", self.api_base, full_name)
    }

    /// Relation listing page. Page 1 is the default, unparameterized
    /// listing; the page parameter is appended only beyond that.
    #[must_use]
    pub fn relation(&self, account: &Handle, relation: Relation, page: u32) -> String {
        let mut url = format!("{}/{}/{}", self.web_base, account, relation.as_segment());
        if page > 1 {
            url.push_str(&format!("?page={page}"));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgemail_core::PlatformConfig;

    fn endpoints() -> Endpoints {
        Endpoints::new(&PlatformConfig::default())
    }

    fn handle(name: &str) -> Handle {
        Handle::new(name).expect("valid handle")
    }

    #[test]
    fn test_api_urls() {
        let eps = endpoints();
        let account = handle("octocat");
        assert_eq!(
            eps.metadata(&account),
            "https://api.github.com/users/octocat"
        );
        assert_eq!(
            eps.repositories(&account),
            "https://api.github.com/users/octocat/repos?type=owner&sort=updated"
        );
        assert_eq!(
            eps.commits("octocat/hello-world"),
            "https://api.github.com/repos/octocat/hello-world/commits"
        );
    }

    #[test]
    fn test_profile_url() {
        assert_eq!(
            endpoints().profile(&handle("octocat")),
            "https://github.com/octocat"
        );
    }

    #[test]
    fn test_relation_page_one_has_no_parameter() {
        let url = endpoints().relation(&handle("octocat"), Relation::Followers, 1);
        assert_eq!(url, "https://github.com/octocat/followers");
        assert!(!url.contains("page="));
    }

    #[test]
    fn test_relation_page_two_has_one_parameter() {
        let url = endpoints().relation(&handle("octocat"), Relation::Following, 2);
        assert_eq!(url, "https://github.com/octocat/following?page=2");
        assert_eq!(url.matches("page=").count(), 1);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let platform = PlatformConfig {
            web_base: "https://forge.example.com/".to_string(),
            api_base: "https://api.forge.example.com/".to_string(),
            ..PlatformConfig::default()
        };
        let eps = Endpoints::new(&platform);
        assert_eq!(
            eps.profile(&handle("octocat")),
            "https://forge.example.com/octocat"
        );
    }
}
