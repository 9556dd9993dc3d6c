//! Avatar URL derivation.

use crate::model::UserId;

/// Pure mapping from user id to avatar URL.
///
/// Implementations must return the same URL for the same id on every call.
pub trait AvatarUrlPolicy: Send + Sync {
    /// Avatar URL for `id`
    fn avatar_url(&self, id: UserId) -> String;
}

/// Robohash robot avatars, the default look of the feed.
pub const ROBOHASH_TEMPLATE: &str = "https://robohash.org/{id}?set=set4";

/// Avatar policy that substitutes the id into a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAvatars {
    template: String,
}

impl TemplateAvatars {
    /// Policy from a template containing `{id}`
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The robohash template
    #[must_use]
    pub fn robohash() -> Self {
        Self::new(ROBOHASH_TEMPLATE)
    }
}

impl Default for TemplateAvatars {
    fn default() -> Self {
        Self::robohash()
    }
}

impl AvatarUrlPolicy for TemplateAvatars {
    fn avatar_url(&self, id: UserId) -> String {
        self.template.replace("{id}", &id.to_string())
    }
}

impl<F> AvatarUrlPolicy for F
where
    F: Fn(UserId) -> String + Send + Sync,
{
    fn avatar_url(&self, id: UserId) -> String {
        self(id)
    }
}
