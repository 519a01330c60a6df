use std::collections::HashMap;

/// What a name reference resolved to.
///
/// `caption` and `avatar` are ready-made markup and are spliced in verbatim;
/// `encoded_id` is escaped before it lands in an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedProfile {
    pub encoded_id: String,
    pub caption: String,
    pub avatar: String,
}

impl ResolvedProfile {
    pub fn new(
        encoded_id: impl Into<String>,
        caption: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            encoded_id: encoded_id.into(),
            caption: caption.into(),
            avatar: avatar.into(),
        }
    }
}

/// Looks up `@name` references.
///
/// Implementations get the name without its leading `@` and must not have
/// side effects the scanner could observe. Lookups run inline during the
/// scan, so they should hit a local or cached source.
pub trait NameResolver {
    fn resolve(&self, name: &str) -> Option<ResolvedProfile>;
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn resolve(&self, name: &str) -> Option<ResolvedProfile> {
        (**self).resolve(name)
    }
}

impl<R: NameResolver + ?Sized> NameResolver for Box<R> {
    fn resolve(&self, name: &str) -> Option<ResolvedProfile> {
        (**self).resolve(name)
    }
}

/// Resolves nothing; only addresses get linked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn resolve(&self, _name: &str) -> Option<ResolvedProfile> {
        None
    }
}

/// Resolves names through a closure.
///
/// ```
/// use weaver_autolink::{NameResolver, ResolveWith, ResolvedProfile};
///
/// let staff = ResolveWith(|name: &str| {
///     (name == "admin").then(|| ResolvedProfile::new("0", "", ""))
/// });
/// assert!(staff.resolve("admin").is_some());
/// assert!(staff.resolve("alice").is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResolveWith<F>(pub F);

impl<F> NameResolver for ResolveWith<F>
where
    F: Fn(&str) -> Option<ResolvedProfile>,
{
    fn resolve(&self, name: &str) -> Option<ResolvedProfile> {
        (self.0)(name)
    }
}

/// Exact-match lookup keyed by name without the `@`.
impl NameResolver for HashMap<String, ResolvedProfile> {
    fn resolve(&self, name: &str) -> Option<ResolvedProfile> {
        self.get(name).cloned()
    }
}
