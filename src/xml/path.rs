use super::Node;
use std::fmt;

/// Absolute path into a [`Node`] tree, built step by step.
///
/// Supports exact child-name selection and an optional equality predicate on
/// a child element's text, which is all OpenNebula lookups need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub child: String,
    pub value: String,
}

impl Path {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![Step {
                name: name.into(),
                predicate: None,
            }],
        }
    }

    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step {
            name: name.into(),
            predicate: None,
        });
        self
    }

    /// Select `name` children whose `child` element text equals `value`
    pub fn child_where(
        mut self,
        name: impl Into<String>,
        child: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.steps.push(Step {
            name: name.into(),
            predicate: Some(Predicate {
                child: child.into(),
                value: value.into(),
            }),
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Step {
    pub fn matches(&self, node: &Node) -> bool {
        if node.name != self.name {
            return false;
        }
        match &self.predicate {
            None => true,
            Some(p) => node
                .children
                .iter()
                .any(|c| c.name == p.child && c.text == p.value),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{}", step.name)?;
            if let Some(p) = &step.predicate {
                write!(f, "[{}='{}']", p.child, p.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_plain() {
        let path = Path::root("VM").child("TEMPLATE").child("NIC").child("IP");
        assert_eq!(path.to_string(), "/VM/TEMPLATE/NIC/IP");
    }

    #[test]
    fn test_display_predicate() {
        let path = Path::root("VM")
            .child("TEMPLATE")
            .child_where("NIC", "NETWORK", "private")
            .child("IP");
        assert_eq!(path.to_string(), "/VM/TEMPLATE/NIC[NETWORK='private']/IP");
    }

    #[test]
    fn test_step_predicate_requires_exact_text() {
        let mut nic = Node::new("NIC");
        let mut id = Node::new("NIC_ID");
        id.text = "10".to_string();
        nic.children.push(id);

        let step = Path::root("X").child_where("NIC", "NIC_ID", "1").steps()[1].clone();
        assert!(!step.matches(&nic));

        let step = Path::root("X").child_where("NIC", "NIC_ID", "10").steps()[1].clone();
        assert!(step.matches(&nic));
    }

    #[test]
    fn test_step_name_mismatch() {
        let step = Path::root("NIC").steps()[0].clone();
        assert!(!step.matches(&Node::new("DISK")));
        assert!(step.matches(&Node::new("NIC")));
    }
}
