use super::{Host, HostError, ScopeId};
use tracing::{debug, warn};

/// An open mutation scope. Rolls back on drop unless [`Transaction::commit`] succeeded.
pub struct Transaction<'h, H: Host + ?Sized> {
    host: &'h mut H,
    scope: ScopeId,
    label: String,
    committed: bool,
}

impl<'h, H: Host + ?Sized> Transaction<'h, H> {
    pub fn start(host: &'h mut H, label: &str) -> Result<Self, HostError> {
        let scope = host.begin_scope(label)?;
        debug!(label, scope = scope.0, "mutation scope opened");
        Ok(Self {
            host,
            scope,
            label: label.to_string(),
            committed: false,
        })
    }

    /// The host, for mutations inside this scope.
    pub fn host(&mut self) -> &mut H {
        self.host
    }

    pub fn commit(mut self) -> Result<(), HostError> {
        self.host.commit(self.scope)?;
        self.committed = true;
        debug!(label = %self.label, scope = self.scope.0, "mutation scope committed");
        Ok(())
    }
}

impl<H: Host + ?Sized> Drop for Transaction<'_, H> {
    fn drop(&mut self) {
        if !self.committed {
            warn!(label = %self.label, "rolling back mutation scope");
            self.host.rollback(self.scope);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::model::Category;

    #[test]
    fn commit_publishes_reports() {
        let mut host = MemoryHost::default();
        let mut tx = Transaction::start(&mut host, "Create schedule").unwrap();
        tx.host()
            .create_report(Category::Rooms, "All Departments")
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(host.report_names(), vec!["All Departments".to_string()]);
    }

    #[test]
    fn drop_without_commit_rolls_back() {
        let mut host = MemoryHost::default();
        {
            let mut tx = Transaction::start(&mut host, "Create schedule").unwrap();
            tx.host()
                .create_report(Category::Rooms, "All Departments")
                .unwrap();
        }

        assert!(host.report_names().is_empty());
        assert!(host.schedules().is_empty());
        // The scope is closed again, so a new one can open.
        assert!(Transaction::start(&mut host, "again").is_ok());
    }

    #[test]
    fn mutations_outside_a_scope_are_rejected() {
        let mut host = MemoryHost::default();
        assert_eq!(
            host.create_report(Category::Rooms, "x"),
            Err(HostError::NoActiveScope)
        );
    }
}
