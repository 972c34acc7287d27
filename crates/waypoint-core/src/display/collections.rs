//! Collection wrapper types for displaying groups of flows.

use std::fmt;

use crate::flow::Flow;

/// Newtype wrapper listing flows by name and ID.
///
/// # Examples
///
/// ```rust
/// use waypoint_core::{display::FlowList, Flow};
///
/// let flows = [Flow::new("Onboarding")];
/// let output = format!("{}", FlowList(flows.iter().collect()));
/// assert!(output.contains("Onboarding"));
/// ```
pub struct FlowList<'a>(pub Vec<&'a Flow>);

impl FlowList<'_> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> FromIterator<&'a Flow> for FlowList<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Flow>>(iter: I) -> Self {
        FlowList(iter.into_iter().collect())
    }
}

impl fmt::Display for FlowList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No flows found.");
        }

        for flow in &self.0 {
            let done = if flow.is_completed() { " (completed)" } else { "" };
            writeln!(
                f,
                "- {} (ID: {}, {} steps){done}",
                flow.name(),
                flow.id(),
                flow.steps().len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::EndStep;

    #[test]
    fn test_empty_list() {
        let list: FlowList<'_> = std::iter::empty().collect();
        assert!(list.is_empty());
        assert_eq!(list.to_string(), "No flows found.\n");
    }

    #[test]
    fn test_list_lines() {
        let mut first = Flow::new("First");
        first.add_step(EndStep).unwrap();
        let second = Flow::new("Second");

        let list: FlowList<'_> = [&first, &second].into_iter().collect();
        let shown = list.to_string();

        assert_eq!(list.len(), 2);
        assert!(shown.contains(&format!("- First (ID: {}, 1 steps)\n", first.id())));
        assert!(shown.contains(&format!("- Second (ID: {}, 0 steps)\n", second.id())));
    }
}
