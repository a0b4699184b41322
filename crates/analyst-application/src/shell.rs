use analyst_core::navigation::{Location, Navigator};

/// Owner of the current location.
///
/// The location is the only record of which session is active: views read
/// it on mount and change it through the [`Navigator`] capability.
#[derive(Debug, Clone)]
pub struct NavigationShell {
    location: Location,
}

impl NavigationShell {
    pub fn new(initial: Location) -> Self {
        Self { location: initial }
    }
}

impl Navigator for NavigationShell {
    fn location(&self) -> &Location {
        &self.location
    }

    fn navigate(&mut self, location: Location) {
        tracing::debug!("[Navigation] {} -> {}", self.location, location);
        self.location = location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::session::SessionId;

    #[test]
    fn test_navigate_replaces_location() {
        let mut shell = NavigationShell::new(Location::notebook());
        let id = SessionId::parse("abc").unwrap();
        shell.open_session(&id);
        assert_eq!(shell.location().to_string(), "/?chat=abc");

        for _ in 0..1000 {
            shell.navigate(Location::notebook());
            shell.open_session(&id);
        }
        assert_eq!(shell.location(), &Location::chat(id));
    }
}
