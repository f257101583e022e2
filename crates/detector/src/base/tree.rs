use super::DetectorEvaluation;
use std::path::{Path, PathBuf};

/// One node per filesystem directory, created once by the finder and never
/// moved. Each node owns its children and the evaluations of every candidate
/// rule at that directory, plus the file names captured at walk time (the
/// directory contents predicates were evaluated against).
#[derive(Debug)]
pub struct DetectorEvaluationTree {
    directory: PathBuf,
    depth_from_root: usize,
    file_names: Vec<String>,
    evaluations: Vec<DetectorEvaluation>,
    children: Vec<DetectorEvaluationTree>,
}

impl DetectorEvaluationTree {
    pub fn new(
        directory: PathBuf,
        depth_from_root: usize,
        file_names: Vec<String>,
        evaluations: Vec<DetectorEvaluation>,
        children: Vec<DetectorEvaluationTree>,
    ) -> Self {
        Self {
            directory,
            depth_from_root,
            file_names,
            evaluations,
            children,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn depth_from_root(&self) -> usize {
        self.depth_from_root
    }

    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    pub fn evaluations(&self) -> &[DetectorEvaluation] {
        &self.evaluations
    }

    pub(crate) fn evaluations_mut(&mut self) -> &mut [DetectorEvaluation] {
        &mut self.evaluations
    }

    pub fn children(&self) -> &[DetectorEvaluationTree] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [DetectorEvaluationTree] {
        &mut self.children
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth-first preorder flattening of every evaluation in the tree. The
    /// order is stable for a given tree.
    pub fn flatten(&self) -> Vec<&DetectorEvaluation> {
        let mut result = Vec::new();
        self.collect_evaluations(&mut result);
        result
    }

    fn collect_evaluations<'a>(&'a self, into: &mut Vec<&'a DetectorEvaluation>) {
        into.extend(self.evaluations.iter());
        for child in &self.children {
            child.collect_evaluations(into);
        }
    }

    /// Depth-first preorder walk over nodes.
    pub fn for_each_node(&self, visit: &mut impl FnMut(&DetectorEvaluationTree)) {
        visit(self);
        for child in &self.children {
            child.for_each_node(visit);
        }
    }
}
