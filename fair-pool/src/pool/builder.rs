use crate::error::EmptyPoolError;
use crate::pool::core::ResourcePool;
use std::fmt;

/// Builder for [`ResourcePool`].
///
/// Collects the resource set and optional diagnostics before construction.
/// Useful when resources come from several places or when the pool should
/// carry a label in log output.
///
/// # Examples
///
/// ```rust
/// use fair_pool::ResourcePool;
///
/// let pool = ResourcePool::builder()
///     .resource("primary")
///     .resource("replica")
///     .label("db-connections")
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.size(), 2);
/// assert_eq!(pool.label(), Some("db-connections"));
/// ```
pub struct PoolBuilder<R> {
    resources: Vec<R>,
    label: Option<String>,
}

impl<R> ResourcePool<R> {
    /// Starts building a pool.
    pub fn builder() -> PoolBuilder<R> {
        PoolBuilder {
            resources: Vec::new(),
            label: None,
        }
    }
}

impl<R> PoolBuilder<R> {
    /// Adds one resource to the set.
    pub fn resource(mut self, resource: R) -> Self {
        self.resources.push(resource);
        self
    }

    /// Adds every resource from the iterator to the set.
    pub fn resources(mut self, resources: impl IntoIterator<Item = R>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Sets a diagnostic label carried in the pool's log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builds the pool.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPoolError`] if no resources were added.
    ///
    /// # Panics
    ///
    /// Panics if the resource count exceeds
    /// [`MAX_RESOURCES`](ResourcePool::MAX_RESOURCES).
    pub fn build(self) -> Result<ResourcePool<R>, EmptyPoolError> {
        if self.resources.is_empty() {
            return Err(EmptyPoolError);
        }
        if self.resources.len() > ResourcePool::<R>::MAX_RESOURCES {
            panic!("resource count exceeds MAX_RESOURCES");
        }
        Ok(ResourcePool::from_parts(self.resources, self.label))
    }
}

impl<R> fmt::Debug for PoolBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("resources", &self.resources.len())
            .field("label", &self.label)
            .finish()
    }
}
