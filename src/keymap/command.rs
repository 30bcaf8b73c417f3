//! Map targets: what a key sequence resolves to
//!
//! Most targets are ex-command templates such as `"scrollline 10"`. When the
//! user typed a count the rendered command gets the count appended as a final
//! argument (`"scrollline 10 5"`). Programmatic bindings may instead carry a
//! callback, which receives the count directly.

use std::fmt;
use std::sync::Arc;

/// A callable map target; receives the numeric prefix, if any
pub type Callback = Arc<dyn Fn(Option<u32>) -> anyhow::Result<()> + Send + Sync>;

/// The value a key sequence is bound to
#[derive(Clone)]
pub enum MapTarget {
    /// An ex-command template
    Excmd(String),
    /// A callback invoked directly by the dispatcher
    Callback(Callback),
}

impl MapTarget {
    /// Wrap a closure as a callback target
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(Option<u32>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        MapTarget::Callback(Arc::new(f))
    }

    /// The command template, if this is an ex command
    pub fn excmd(&self) -> Option<&str> {
        match self {
            MapTarget::Excmd(s) => Some(s),
            MapTarget::Callback(_) => None,
        }
    }

    /// Render the command string for execution.
    ///
    /// `count` is the literal digit string typed before the sequence and is
    /// appended after a space. Callbacks have no command string.
    pub fn render(&self, count: &str) -> Option<String> {
        let template = self.excmd()?;
        if count.is_empty() {
            Some(template.to_string())
        } else {
            Some(format!("{} {}", template, count))
        }
    }

    /// Label used in completion listings
    pub fn display_name(&self) -> &str {
        match self {
            MapTarget::Excmd(s) => s,
            MapTarget::Callback(_) => "<callback>",
        }
    }
}

impl fmt::Debug for MapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapTarget::Excmd(s) => f.debug_tuple("Excmd").field(s).finish(),
            MapTarget::Callback(cb) => write!(f, "Callback({:p})", Arc::as_ptr(cb)),
        }
    }
}

/// Callbacks compare by identity
impl PartialEq for MapTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapTarget::Excmd(a), MapTarget::Excmd(b)) => a == b,
            (MapTarget::Callback(a), MapTarget::Callback(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for MapTarget {
    fn from(s: &str) -> Self {
        MapTarget::Excmd(s.to_string())
    }
}

impl From<String> for MapTarget {
    fn from(s: String) -> Self {
        MapTarget::Excmd(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_count() {
        let target = MapTarget::from("scrolltop");
        assert_eq!(target.render(""), Some("scrolltop".to_string()));
    }

    #[test]
    fn test_render_with_count() {
        let target = MapTarget::from("scrollline 10");
        assert_eq!(target.render("20"), Some("scrollline 10 20".to_string()));
    }

    #[test]
    fn test_callback_has_no_command_string() {
        let target = MapTarget::callback(|_| Ok(()));
        assert_eq!(target.render("3"), None);
        assert_eq!(target.display_name(), "<callback>");
    }

    #[test]
    fn test_callback_identity() {
        let a = MapTarget::callback(|_| Ok(()));
        let b = a.clone();
        let c = MapTarget::callback(|_| Ok(()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
