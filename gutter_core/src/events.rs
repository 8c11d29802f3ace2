use bitflags::bitflags;

bitflags! {
    /// Host lifecycle events queued before a `git_gutter` run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Events: u32 {
        /// The view finished loading its file.
        const LOAD = 0b0001;
        /// The view gained focus.
        const ACTIVATED = 0b0010;
        /// The view's file was saved.
        const POST_SAVE = 0b0100;
        /// The buffer was edited.
        const MODIFIED = 0b1000;
    }
}

impl Events {
    /// Events after which cached git lookups are re-validated.
    pub const VALIDATE: Self = Self::LOAD.union(Self::ACTIVATED).union(Self::POST_SAVE);
    /// Events after which the reference content is still current.
    pub const KEEP_GIT_FILE: Self = Self::LOAD.union(Self::MODIFIED);

    /// Whether a gate check triggered by `events` must re-validate git
    /// lookups. Checks without queued events always validate.
    #[must_use]
    pub const fn requires_validation(events: Option<Self>) -> bool {
        match events {
            None => true,
            Some(events) => events.intersects(Self::VALIDATE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_depends_on_events() {
        assert!(Events::requires_validation(None));
        assert!(Events::requires_validation(Some(Events::LOAD)));
        assert!(Events::requires_validation(Some(
            Events::MODIFIED | Events::POST_SAVE
        )));
        assert!(!Events::requires_validation(Some(Events::MODIFIED)));
        assert!(!Events::requires_validation(Some(Events::empty())));
    }

    #[test]
    fn raw_bits_round_trip() {
        let events = Events::from_bits_truncate(0b1_0101);
        assert_eq!(events, Events::LOAD | Events::POST_SAVE);
        assert_eq!(events.bits(), 0b0101);
    }
}
