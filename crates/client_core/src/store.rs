use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use shared::domain::{DisplayMode, Post};

use crate::seed::seed_posts;

/// Canonical post list plus the display-mode flag.
///
/// `posts == None` means nothing has been loaded yet, which is not the same
/// as an empty list. The store trusts its callers: lists are replaced
/// wholesale and never validated here.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Option<Vec<Post>>,
    display_mode: DisplayMode,
    sync_generation: u64,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two offline posts shown before any fetch lands.
    pub fn seeded() -> Self {
        Self::with_posts(seed_posts())
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Some(posts),
            ..Self::default()
        }
    }

    pub fn get_posts(&self) -> Option<&[Post]> {
        self.posts.as_deref()
    }

    pub fn replace_posts(&mut self, new_list: Vec<Post>) {
        self.posts = Some(new_list);
    }

    pub fn get_display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Overwrites the mode. Callers compute the negation themselves.
    pub fn set_display_mode(&mut self, mode: bool) {
        self.display_mode = DisplayMode::from(mode);
    }

    /// Stamps a new sync activation. Responses carrying an older stamp are
    /// rejected by [`ContentStore::commit_sync`].
    pub fn begin_sync(&mut self) -> u64 {
        self.sync_generation += 1;
        self.sync_generation
    }

    /// Replaces the post list if `generation` is still the latest activation.
    /// Returns whether the list was written.
    pub fn commit_sync(&mut self, generation: u64, posts: Vec<Post>) -> bool {
        if generation != self.sync_generation {
            return false;
        }
        self.replace_posts(posts);
        true
    }
}

/// Thread-safe handle to a [`ContentStore`].
///
/// Every method takes the lock for a single synchronous operation; the lock
/// is never held across an await point.
#[derive(Debug, Clone, Default)]
pub struct SharedContentStore {
    inner: Arc<RwLock<ContentStore>>,
}

impl SharedContentStore {
    pub fn new(store: ContentStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(ContentStore::seeded())
    }

    fn read(&self) -> RwLockReadGuard<'_, ContentStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContentStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn posts(&self) -> Option<Vec<Post>> {
        self.read().get_posts().map(<[Post]>::to_vec)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.read().get_display_mode()
    }

    /// Runs `f` against the current posts and mode without cloning the list.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(Option<&[Post]>, DisplayMode) -> R) -> R {
        let guard = self.read();
        f(guard.get_posts(), guard.get_display_mode())
    }

    pub fn replace_posts(&self, new_list: Vec<Post>) {
        self.write().replace_posts(new_list);
    }

    pub fn set_display_mode(&self, mode: bool) {
        self.write().set_display_mode(mode);
    }

    pub fn begin_sync(&self) -> u64 {
        self.write().begin_sync()
    }

    pub fn commit_sync(&self, generation: u64, posts: Vec<Post>) -> bool {
        self.write().commit_sync(generation, posts)
    }

    pub fn downgrade(&self) -> WeakContentStore {
        WeakContentStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle held by in-flight syncs so a torn-down store is never
/// written.
#[derive(Debug, Clone)]
pub struct WeakContentStore {
    inner: Weak<RwLock<ContentStore>>,
}

impl WeakContentStore {
    pub fn upgrade(&self) -> Option<SharedContentStore> {
        self.inner
            .upgrade()
            .map(|inner| SharedContentStore { inner })
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
