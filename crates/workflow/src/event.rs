//! Phase-completion notifications. Listeners are advisory observers: they
//! receive shared references only and cannot affect the evaluation result,
//! and their registration order carries no meaning.

use crate::result::DetectorToolResult;
use bomscan_detector::DetectorEvaluationTree;
use tracing::info;

#[allow(unused_variables)]
pub trait DetectorEventListener {
    fn search_completed(&self, tree: &DetectorEvaluationTree) {}

    fn preparations_completed(&self, tree: &DetectorEvaluationTree) {}

    fn extractions_completed(&self, tree: &DetectorEvaluationTree) {}

    fn detectors_complete(&self, result: &DetectorToolResult) {}
}

/// Synchronous observer list.
#[derive(Default)]
pub struct EventSystem {
    listeners: Vec<Box<dyn DetectorEventListener>>,
}

impl EventSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Box<dyn DetectorEventListener>) {
        self.listeners.push(listener);
    }

    pub fn publish_search_completed(&self, tree: &DetectorEvaluationTree) {
        for listener in &self.listeners {
            listener.search_completed(tree);
        }
    }

    pub fn publish_preparations_completed(&self, tree: &DetectorEvaluationTree) {
        for listener in &self.listeners {
            listener.preparations_completed(tree);
        }
    }

    pub fn publish_extractions_completed(&self, tree: &DetectorEvaluationTree) {
        for listener in &self.listeners {
            listener.extractions_completed(tree);
        }
    }

    pub fn publish_detectors_complete(&self, result: &DetectorToolResult) {
        for listener in &self.listeners {
            listener.detectors_complete(result);
        }
    }
}

/// Logs a one-line summary at each phase boundary.
pub struct LoggingStatusListener;

impl DetectorEventListener for LoggingStatusListener {
    fn search_completed(&self, tree: &DetectorEvaluationTree) {
        let applicable = tree.flatten().iter().filter(|e| e.is_applicable()).count();
        info!(
            directories = tree.node_count(),
            applicable, "Search completed"
        );
    }

    fn preparations_completed(&self, tree: &DetectorEvaluationTree) {
        let extractable = tree.flatten().iter().filter(|e| e.is_extractable()).count();
        info!(extractable, "Preparations completed");
    }

    fn extractions_completed(&self, tree: &DetectorEvaluationTree) {
        let successful = tree
            .flatten()
            .iter()
            .filter(|e| e.was_extraction_successful())
            .count();
        info!(successful, "Extractions completed");
    }

    fn detectors_complete(&self, result: &DetectorToolResult) {
        info!(
            code_locations = result.bom_tool_code_locations.len(),
            "Detectors complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingListener {
        seen: Rc<RefCell<Vec<&'static str>>>,
    }

    impl DetectorEventListener for RecordingListener {
        fn search_completed(&self, _tree: &DetectorEvaluationTree) {
            self.seen.borrow_mut().push("search");
        }

        fn preparations_completed(&self, _tree: &DetectorEvaluationTree) {
            self.seen.borrow_mut().push("preparations");
        }

        fn extractions_completed(&self, _tree: &DetectorEvaluationTree) {
            self.seen.borrow_mut().push("extractions");
        }
    }

    #[test]
    fn test_all_listeners_notified() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventSystem::new();
        events.add_listener(Box::new(RecordingListener { seen: seen.clone() }));
        events.add_listener(Box::new(RecordingListener { seen: seen.clone() }));

        let tree = bomscan_detector::DetectorEvaluationTree::new(
            std::path::PathBuf::from("/project"),
            0,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        events.publish_search_completed(&tree);
        events.publish_preparations_completed(&tree);

        assert_eq!(
            *seen.borrow(),
            vec!["search", "search", "preparations", "preparations"]
        );
    }
}
