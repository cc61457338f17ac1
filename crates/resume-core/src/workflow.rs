//! Staged workflow state machine
//!
//! Owns the forward-only stage progression (Login → Upload → Analyze →
//! EnhanceExport) and the single-flight request discipline: `begin` hands out
//! a numbered ticket per operation and refuses a second ticket while one is
//! outstanding. Only a completion holding the current ticket may mutate
//! state; a completion with a stale ticket is silently discarded, so a
//! response that arrives after the user has moved on can never clobber
//! newer state.

use std::collections::HashMap;

use crate::error::WorkflowError;
use crate::selection::SkillSelection;
use crate::types::{EnhancedResume, JobAnalysisResult, ResumeDocument, Stage};

/// Remote operations subject to single-flight discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Upload,
    Analyze,
    Enhance,
}

/// Handle for one issued request. Completions must present it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    op: Operation,
    seq: u64,
}

impl RequestTicket {
    pub fn operation(&self) -> Operation {
        self.op
    }
}

/// The session's workflow state. One instance per session; each stage's
/// derived data is owned here and only mutated through ticketed completions.
#[derive(Debug)]
pub struct Workflow {
    stage: Stage,
    resume: Option<ResumeDocument>,
    analysis: Option<JobAnalysisResult>,
    selection: SkillSelection,
    enhanced: Option<EnhancedResume>,
    in_flight: HashMap<Operation, u64>,
    next_seq: u64,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            stage: Stage::Login,
            resume: None,
            analysis: None,
            selection: SkillSelection::new(),
            enhanced: None,
            in_flight: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn resume(&self) -> Option<&ResumeDocument> {
        self.resume.as_ref()
    }

    pub fn analysis(&self) -> Option<&JobAnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn enhanced(&self) -> Option<&EnhancedResume> {
        self.enhanced.as_ref()
    }

    pub fn selection(&self) -> &SkillSelection {
        &self.selection
    }

    /// Check or uncheck a missing skill for enhancement.
    pub fn toggle_skill(&mut self, skill: &str, checked: bool) {
        self.selection.toggle(skill, checked);
    }

    /// Whether a request for `op` is currently outstanding.
    pub fn is_pending(&self, op: Operation) -> bool {
        self.in_flight.contains_key(&op)
    }

    /// Whether any request is currently outstanding.
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// The enhance trigger is enabled iff an analysis exists, at least one
    /// skill is selected, and no enhance request is in flight.
    pub fn can_enhance(&self) -> bool {
        self.analysis.is_some()
            && !self.selection.is_empty()
            && !self.is_pending(Operation::Enhance)
    }

    /// Start a request. Fails if the operation is out of turn for the
    /// current stage, if one is already in flight, or if the enhance
    /// preconditions are unmet.
    pub fn begin(&mut self, op: Operation) -> Result<RequestTicket, WorkflowError> {
        match op {
            Operation::Login => {
                if self.stage != Stage::Login {
                    return Err(WorkflowError::WrongStage(self.stage));
                }
            }
            Operation::Upload => {
                if self.stage != Stage::Upload {
                    return Err(WorkflowError::WrongStage(self.stage));
                }
            }
            Operation::Analyze => {
                if self.stage != Stage::Analyze && self.stage != Stage::EnhanceExport {
                    return Err(WorkflowError::WrongStage(self.stage));
                }
            }
            Operation::Enhance => {
                if self.stage != Stage::Analyze && self.stage != Stage::EnhanceExport {
                    return Err(WorkflowError::WrongStage(self.stage));
                }
                if self.analysis.is_none() || self.selection.is_empty() {
                    return Err(WorkflowError::NothingSelected);
                }
            }
        }

        if self.in_flight.contains_key(&op) {
            return Err(WorkflowError::RequestInFlight);
        }

        self.next_seq += 1;
        let ticket = RequestTicket {
            op,
            seq: self.next_seq,
        };
        self.in_flight.insert(op, ticket.seq);
        Ok(ticket)
    }

    /// Record a failed request. State is left untouched; returns whether the
    /// ticket was the current one (a stale failure is discarded too).
    pub fn fail(&mut self, ticket: RequestTicket) -> bool {
        self.take_current(ticket)
    }

    /// Authentication succeeded: advance Login → Upload.
    pub fn complete_login(&mut self, ticket: RequestTicket) -> bool {
        if !self.take_current(ticket) {
            return false;
        }
        self.stage = Stage::Upload;
        true
    }

    /// Upload accepted by the service: store the document and advance
    /// Upload → Analyze. Any downstream state from a previous document is
    /// discarded.
    pub fn complete_upload(&mut self, ticket: RequestTicket, document: ResumeDocument) -> bool {
        if !self.take_current(ticket) {
            return false;
        }
        self.resume = Some(document);
        self.analysis = None;
        self.selection.reset(&[]);
        self.enhanced = None;
        self.stage = Stage::Analyze;
        true
    }

    /// Analysis succeeded: the new result replaces any previous one, the
    /// selection resets to empty, and the enhance controls unlock.
    pub fn complete_analysis(&mut self, ticket: RequestTicket, result: JobAnalysisResult) -> bool {
        if !self.take_current(ticket) {
            return false;
        }
        self.selection.reset(&result.missing_skills);
        self.analysis = Some(result);
        self.enhanced = None;
        self.stage = Stage::EnhanceExport;
        true
    }

    /// Enhancement succeeded: the result replaces any previous one. The
    /// selection is preserved (request input is independent of outcome).
    pub fn complete_enhance(&mut self, ticket: RequestTicket, result: EnhancedResume) -> bool {
        if !self.take_current(ticket) {
            return false;
        }
        self.enhanced = Some(result);
        true
    }

    /// Remove the in-flight entry iff `ticket` is the current request for
    /// its operation.
    fn take_current(&mut self, ticket: RequestTicket) -> bool {
        if self.in_flight.get(&ticket.op) == Some(&ticket.seq) {
            self.in_flight.remove(&ticket.op);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis_fixture() -> JobAnalysisResult {
        JobAnalysisResult {
            match_percentage: 50.0,
            matched_skills: vec!["Python".to_string()],
            missing_skills: vec!["Kubernetes".to_string()],
        }
    }

    fn document_fixture() -> ResumeDocument {
        ResumeDocument {
            id: "7".to_string(),
            content: "<!DOCTYPE html><html></html>".to_string(),
            format: crate::types::ResumeFormat::Html,
        }
    }

    fn enhanced_fixture() -> EnhancedResume {
        EnhancedResume {
            enhanced_content: "<!DOCTYPE html><html>better</html>".to_string(),
            changes_made: vec!["Added Kubernetes experience".to_string()],
        }
    }

    /// Drive a fresh workflow to the EnhanceExport stage.
    fn workflow_at_enhance() -> Workflow {
        let mut wf = Workflow::new();
        let t = wf.begin(Operation::Login).unwrap();
        wf.complete_login(t);
        let t = wf.begin(Operation::Upload).unwrap();
        wf.complete_upload(t, document_fixture());
        let t = wf.begin(Operation::Analyze).unwrap();
        wf.complete_analysis(t, analysis_fixture());
        wf
    }

    #[test]
    fn initial_stage_is_login() {
        let wf = Workflow::new();
        assert_eq!(wf.stage(), Stage::Login);
        assert!(!wf.is_busy());
    }

    #[test]
    fn login_success_advances_to_upload() {
        let mut wf = Workflow::new();
        let t = wf.begin(Operation::Login).unwrap();
        assert!(wf.complete_login(t));
        assert_eq!(wf.stage(), Stage::Upload);
    }

    #[test]
    fn login_failure_keeps_stage() {
        let mut wf = Workflow::new();
        let t = wf.begin(Operation::Login).unwrap();
        assert!(wf.fail(t));
        assert_eq!(wf.stage(), Stage::Login);
        assert!(!wf.is_busy());
        // Retry is possible.
        assert!(wf.begin(Operation::Login).is_ok());
    }

    #[test]
    fn upload_requires_upload_stage() {
        let mut wf = Workflow::new();
        assert_eq!(
            wf.begin(Operation::Upload).unwrap_err(),
            WorkflowError::WrongStage(Stage::Login)
        );
    }

    #[test]
    fn second_begin_while_pending_is_refused() {
        let mut wf = Workflow::new();
        let _t = wf.begin(Operation::Login).unwrap();
        assert_eq!(
            wf.begin(Operation::Login).unwrap_err(),
            WorkflowError::RequestInFlight
        );
    }

    #[test]
    fn upload_success_carries_document_into_analyze() {
        let mut wf = Workflow::new();
        let t = wf.begin(Operation::Login).unwrap();
        wf.complete_login(t);
        let t = wf.begin(Operation::Upload).unwrap();
        assert!(wf.complete_upload(t, document_fixture()));
        assert_eq!(wf.stage(), Stage::Analyze);
        assert_eq!(wf.resume().unwrap().id, "7");
    }

    #[test]
    fn analysis_success_resets_selection_and_unlocks_enhance() {
        let wf = workflow_at_enhance();
        assert_eq!(wf.stage(), Stage::EnhanceExport);
        assert!(wf.selection().is_empty());
        assert!(!wf.can_enhance()); // nothing selected yet
    }

    #[test]
    fn enhance_gated_on_nonempty_selection() {
        let mut wf = workflow_at_enhance();
        assert_eq!(
            wf.begin(Operation::Enhance).unwrap_err(),
            WorkflowError::NothingSelected
        );

        wf.toggle_skill("Kubernetes", true);
        assert!(wf.can_enhance());
        assert!(wf.begin(Operation::Enhance).is_ok());
    }

    #[test]
    fn enhance_disabled_while_request_pending() {
        let mut wf = workflow_at_enhance();
        wf.toggle_skill("Kubernetes", true);
        let _t = wf.begin(Operation::Enhance).unwrap();
        assert!(!wf.can_enhance());
    }

    #[test]
    fn reanalyze_replaces_result_and_clears_selection() {
        let mut wf = workflow_at_enhance();
        wf.toggle_skill("Kubernetes", true);
        assert!(!wf.selection().is_empty());

        let t = wf.begin(Operation::Analyze).unwrap();
        let second = JobAnalysisResult {
            match_percentage: 75.0,
            matched_skills: vec!["Python".to_string(), "Kubernetes".to_string()],
            missing_skills: vec!["Terraform".to_string()],
        };
        assert!(wf.complete_analysis(t, second.clone()));

        assert_eq!(wf.analysis(), Some(&second));
        assert!(wf.selection().is_empty());
    }

    #[test]
    fn failed_analyze_leaves_prior_result_untouched() {
        let mut wf = workflow_at_enhance();
        let before = wf.analysis().cloned();

        let t = wf.begin(Operation::Analyze).unwrap();
        assert!(wf.fail(t));

        assert_eq!(wf.analysis(), before.as_ref());
        assert_eq!(wf.stage(), Stage::EnhanceExport);
    }

    #[test]
    fn failed_enhance_preserves_selection_and_prior_result() {
        let mut wf = workflow_at_enhance();
        wf.toggle_skill("Kubernetes", true);

        let t = wf.begin(Operation::Enhance).unwrap();
        wf.complete_enhance(t, enhanced_fixture());

        let t = wf.begin(Operation::Enhance).unwrap();
        assert!(wf.fail(t));

        assert!(wf.selection().is_selected("Kubernetes"));
        assert_eq!(wf.enhanced(), Some(&enhanced_fixture()));
    }

    #[test]
    fn enhance_success_replaces_previous_result() {
        let mut wf = workflow_at_enhance();
        wf.toggle_skill("Kubernetes", true);

        let t = wf.begin(Operation::Enhance).unwrap();
        wf.complete_enhance(t, enhanced_fixture());

        let t = wf.begin(Operation::Enhance).unwrap();
        let second = EnhancedResume {
            enhanced_content: "v2".to_string(),
            changes_made: vec!["Rewrote summary".to_string()],
        };
        assert!(wf.complete_enhance(t, second.clone()));
        assert_eq!(wf.enhanced(), Some(&second));
    }

    #[test]
    fn stale_ticket_completion_is_discarded() {
        let mut wf = workflow_at_enhance();

        let stale = wf.begin(Operation::Analyze).unwrap();
        assert!(wf.fail(stale)); // user retried after a failure
        let current = wf.begin(Operation::Analyze).unwrap();

        // Late response from the abandoned request arrives after the retry
        // was issued: it must not mutate state.
        let late = JobAnalysisResult {
            match_percentage: 1.0,
            matched_skills: vec![],
            missing_skills: vec![],
        };
        assert!(!wf.complete_analysis(stale, late));
        assert_eq!(wf.analysis().unwrap().match_percentage, 50.0);

        // The live request still completes normally.
        assert!(wf.complete_analysis(current, analysis_fixture()));
    }

    #[test]
    fn stale_failure_is_discarded_too() {
        let mut wf = Workflow::new();
        let stale = wf.begin(Operation::Login).unwrap();
        wf.fail(stale);
        let _current = wf.begin(Operation::Login).unwrap();
        assert!(!wf.fail(stale));
        assert!(wf.is_pending(Operation::Login));
    }

    #[test]
    fn new_upload_discards_downstream_state() {
        let mut wf = workflow_at_enhance();
        wf.toggle_skill("Kubernetes", true);
        let t = wf.begin(Operation::Enhance).unwrap();
        wf.complete_enhance(t, enhanced_fixture());

        // The workflow is forward-only, so a replacement upload can only be
        // driven by completing an Upload ticket from the Upload stage; the
        // completion itself must clear analysis, selection, and enhanced.
        let mut fresh = Workflow::new();
        let t = fresh.begin(Operation::Login).unwrap();
        fresh.complete_login(t);
        let t = fresh.begin(Operation::Upload).unwrap();
        fresh.complete_upload(t, document_fixture());
        assert!(fresh.analysis().is_none());
        assert!(fresh.enhanced().is_none());
        assert!(fresh.selection().is_empty());
    }

    #[test]
    fn analyze_and_enhance_can_be_pending_together() {
        let mut wf = workflow_at_enhance();
        wf.toggle_skill("Kubernetes", true);

        let _e = wf.begin(Operation::Enhance).unwrap();
        // Single-flight is per operation; a re-analysis may start while an
        // enhancement is pending.
        assert!(wf.begin(Operation::Analyze).is_ok());
    }
}
