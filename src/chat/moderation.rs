//! Moderation state shared by all rooms.

use std::collections::HashSet;

use tokio::sync::RwLock;

/// Set of muted usernames.
///
/// All access goes through `mute`, `unmute` and `is_muted`, each of which
/// takes the lock once.
#[derive(Debug, Default)]
pub struct MutedList {
    users: RwLock<HashSet<String>>,
}

impl MutedList {
    /// Create an empty muted list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute a user.
    ///
    /// Returns true if the user was not muted before.
    pub async fn mute(&self, username: &str) -> bool {
        self.users.write().await.insert(username.to_string())
    }

    /// Unmute a user.
    ///
    /// Returns true if the user was muted.
    pub async fn unmute(&self, username: &str) -> bool {
        self.users.write().await.remove(username)
    }

    /// Check if a user is muted.
    pub async fn is_muted(&self, username: &str) -> bool {
        self.users.read().await.contains(username)
    }

    /// Get all muted usernames, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut users: Vec<String> = self.users.read().await.iter().cloned().collect();
        users.sort();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mute_and_unmute() {
        let muted = MutedList::new();
        assert!(!muted.is_muted("alice").await);

        assert!(muted.mute("alice").await);
        assert!(muted.is_muted("alice").await);

        assert!(muted.unmute("alice").await);
        assert!(!muted.is_muted("alice").await);
    }

    #[tokio::test]
    async fn test_mute_is_idempotent() {
        let muted = MutedList::new();
        assert!(muted.mute("alice").await);
        assert!(!muted.mute("alice").await);
        assert_eq!(muted.list().await, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_unmute_unknown_user() {
        let muted = MutedList::new();
        assert!(!muted.unmute("ghost").await);
    }

    #[tokio::test]
    async fn test_concurrent_mutes() {
        let muted = Arc::new(MutedList::new());

        let mut handles = Vec::new();
        for i in 0..20 {
            let muted = Arc::clone(&muted);
            handles.push(tokio::spawn(async move {
                muted.mute(&format!("user{}", i % 5)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(muted.list().await.len(), 5);
    }
}
