use std::collections::HashSet;
use tracing::warn;

/// Schedule names already taken in the document, plus those claimed during this run.
#[derive(Debug, Default)]
pub struct ReportNames {
    taken: HashSet<String>,
}

impl ReportNames {
    pub fn new<I: IntoIterator<Item = String>>(existing: I) -> Self {
        Self {
            taken: existing.into_iter().collect(),
        }
    }

    /// Claims `name`, or the first free `name (n)` for n >= 2 if it is taken.
    pub fn claim(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_string()) {
            return name.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{name} ({n})");
            if self.taken.insert(candidate.clone()) {
                warn!(requested = name, used = %candidate, "schedule name already exists");
                return candidate;
            }
            n += 1;
        }
    }
}
