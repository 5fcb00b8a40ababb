//! Minimal router: the current location and where we have been.
//!
//! Paths are `/`-joined segment chains rooted at `/`.  Query strings and
//! fragments carry no meaning here.

/// Holds the current path and a navigation history.
#[derive(Debug, Clone)]
pub struct Router {
    current: String,
    history: Vec<String>,
}

impl Router {
    pub fn new(initial: &str) -> Self {
        Self {
            current: normalize(initial),
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Previously visited paths, oldest first.
    #[cfg(test)]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn navigate(&mut self, path: &str) {
        let next = normalize(path);
        if next == self.current {
            return;
        }
        tracing::debug!("navigate {} → {next}", self.current);
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push(prev);
    }

    /// Return to the previous path, if any.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted() {
        assert_eq!(Router::new("dashboard").current(), "/dashboard");
        assert_eq!(Router::new("/reports/monthly/").current(), "/reports/monthly");
        assert_eq!(Router::new("").current(), "/");
    }

    #[test]
    fn navigate_records_history() {
        let mut router = Router::new("/dashboard");
        router.navigate("/reports/monthly");
        router.navigate("/reports/monthly");
        assert_eq!(router.current(), "/reports/monthly");
        assert_eq!(router.history(), ["/dashboard".to_string()]);

        assert!(router.back());
        assert_eq!(router.current(), "/dashboard");
        assert!(!router.back());
    }
}
