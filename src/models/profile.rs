/// Profile facts shown in the gallery header. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub username: String,
    pub display_name: String,
    pub description: String,
    /// Link URLs in the order they appear in the catalog.
    pub links: Vec<String>,
    pub follower_count: u64,
    pub following_count: u64,
}
