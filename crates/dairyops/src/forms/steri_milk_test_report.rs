//! Six-step steri-milk test report form.
//!
//! The batch number and analyst entered on the first step are copied into every
//! later section that carries them.

use std::sync::Arc;

use serde::Serialize;

use super::{placeholder_users, reference_provider, PROCESS_LOGS, USERS};
use crate::broadcast::ToastBroadcaster;
use crate::config::FormSettings;
use crate::entities::{
    IncubationResult, OrganolepticResult, Record, SampleDetails, SteriMilkTestReportSpec,
};
use crate::store::Stores;
use crate::wizard::{
    normalize_signature, FieldSchema, StepSchema, WizardDraft, WizardError, WizardForm,
};

pub type TestReportForm = WizardForm<TestReportDraft>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportBasicInfo {
    pub issue_date: Option<String>,
    pub approved_by: Option<String>,
    pub process_log_id: Option<String>,
    pub batch_number: Option<u32>,
    pub analyst_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleDetailsDraft {
    pub batch_number: Option<u32>,
    pub analyst_id: Option<String>,
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganolepticDraft {
    pub batch_number: Option<u32>,
    pub colour: Option<String>,
    pub taste: Option<String>,
    pub odour: Option<String>,
    pub coagulation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncubationDraft {
    pub batch_number: Option<u32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub ph: Option<f64>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignOffDraft {
    /// Captured signature, as a data URL or bare base64.
    pub signature: Option<String>,
    pub scientist_id: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestReportDraft {
    pub basic_info: ReportBasicInfo,
    pub details: SampleDetailsDraft,
    pub organoleptic: OrganolepticDraft,
    pub incubation_37: IncubationDraft,
    pub incubation_55: IncubationDraft,
    pub sign_off: SignOffDraft,
}

fn incubation_step(key: &'static str, title: &'static str) -> StepSchema {
    StepSchema::new(key, title)
        .field(FieldSchema::new("start_time", "Start time").required().time())
        .field(FieldSchema::new("end_time", "End time").required().time())
        .field(FieldSchema::new("ph", "pH").required().range(0.0, 14.0))
        .field(FieldSchema::new("result", "Result").required())
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, WizardError> {
    value.ok_or(WizardError::MissingField(field))
}

fn into_incubation(
    draft: IncubationDraft,
    batch_number: u32,
) -> Result<IncubationResult, WizardError> {
    Ok(IncubationResult {
        batch_number,
        start_time: required(draft.start_time, "start_time")?,
        end_time: required(draft.end_time, "end_time")?,
        ph: required(draft.ph, "ph")?,
        result: required(draft.result, "result")?,
    })
}

impl WizardDraft for TestReportDraft {
    type Spec = SteriMilkTestReportSpec;

    const TITLE: &'static str = "Test report";

    fn steps() -> Vec<StepSchema> {
        vec![
            StepSchema::new("basic_info", "Basic information")
                .field(FieldSchema::new("issue_date", "Issue date").required())
                .field(FieldSchema::new("approved_by", "Approver").required())
                .field(FieldSchema::new("process_log_id", "Process log").required())
                .field(
                    FieldSchema::new("batch_number", "Batch number")
                        .required()
                        .min(1.0),
                )
                .field(FieldSchema::new("analyst_id", "Analyst").required()),
            StepSchema::new("details", "Sample details")
                .field(FieldSchema::new("time", "Time").required().time())
                .field(FieldSchema::new("temperature", "Temperature").required())
                .field(FieldSchema::new("ph", "pH").required().range(0.0, 14.0)),
            StepSchema::new("organoleptic", "Organoleptic")
                .field(FieldSchema::new("colour", "Colour").required())
                .field(FieldSchema::new("taste", "Taste").required())
                .field(FieldSchema::new("odour", "Odour").required()),
            incubation_step("incubation_37", "Incubation at 37 °C"),
            incubation_step("incubation_55", "Incubation at 55 °C"),
            StepSchema::new("sign_off", "Sign-off")
                .field(
                    FieldSchema::new("signature", "Signature")
                        .required()
                        .signature(),
                )
                .field(FieldSchema::new("scientist_id", "Scientist").required()),
        ]
    }

    fn from_record(record: &Record<SteriMilkTestReportSpec>) -> Self {
        let spec = &record.spec;
        let incubation = |result: &IncubationResult| IncubationDraft {
            batch_number: Some(result.batch_number),
            start_time: Some(result.start_time.clone()),
            end_time: Some(result.end_time.clone()),
            ph: Some(result.ph),
            result: Some(result.result.clone()),
        };

        Self {
            basic_info: ReportBasicInfo {
                issue_date: Some(spec.issue_date.clone()),
                approved_by: Some(spec.approved_by.clone()),
                process_log_id: Some(spec.process_log_id.clone()),
                batch_number: Some(spec.details.batch_number),
                analyst_id: Some(spec.analyst_id.clone()),
            },
            details: SampleDetailsDraft {
                batch_number: Some(spec.details.batch_number),
                analyst_id: Some(spec.details.analyst_id.clone()),
                time: Some(spec.details.time.clone()),
                temperature: Some(spec.details.temperature),
                ph: Some(spec.details.ph),
            },
            organoleptic: OrganolepticDraft {
                batch_number: Some(spec.organoleptic.batch_number),
                colour: Some(spec.organoleptic.colour.clone()),
                taste: Some(spec.organoleptic.taste.clone()),
                odour: Some(spec.organoleptic.odour.clone()),
                coagulation: spec.organoleptic.coagulation,
            },
            incubation_37: incubation(&spec.incubation_37),
            incubation_55: incubation(&spec.incubation_55),
            sign_off: SignOffDraft {
                signature: Some(spec.signature.clone()),
                scientist_id: Some(spec.scientist_id.clone()),
                remarks: spec.remarks.clone(),
            },
        }
    }

    fn apply_derived(&mut self, step: usize) {
        if step != 1 {
            return;
        }
        let batch_number = self.basic_info.batch_number;
        let analyst_id = self.basic_info.analyst_id.clone();

        self.details.batch_number = batch_number;
        self.details.analyst_id = analyst_id;
        self.organoleptic.batch_number = batch_number;
        self.incubation_37.batch_number = batch_number;
        self.incubation_55.batch_number = batch_number;
    }

    fn into_spec(self) -> Result<SteriMilkTestReportSpec, WizardError> {
        let basic = self.basic_info;
        let batch_number = required(basic.batch_number, "batch_number")?;
        let analyst_id = required(basic.analyst_id, "analyst_id")?;
        let signature = normalize_signature(&required(self.sign_off.signature, "signature")?)?;

        Ok(SteriMilkTestReportSpec {
            issue_date: required(basic.issue_date, "issue_date")?,
            approved_by: required(basic.approved_by, "approved_by")?,
            process_log_id: required(basic.process_log_id, "process_log_id")?,
            details: SampleDetails {
                batch_number,
                analyst_id: analyst_id.clone(),
                time: required(self.details.time, "time")?,
                temperature: required(self.details.temperature, "temperature")?,
                ph: required(self.details.ph, "ph")?,
            },
            organoleptic: OrganolepticResult {
                batch_number,
                colour: required(self.organoleptic.colour, "colour")?,
                taste: required(self.organoleptic.taste, "taste")?,
                odour: required(self.organoleptic.odour, "odour")?,
                coagulation: self.organoleptic.coagulation,
            },
            incubation_37: into_incubation(self.incubation_37, batch_number)?,
            incubation_55: into_incubation(self.incubation_55, batch_number)?,
            analyst_id,
            signature,
            scientist_id: required(self.sign_off.scientist_id, "scientist_id")?,
            remarks: self.sign_off.remarks.filter(|r| !r.trim().is_empty()),
        })
    }
}

/// Test report form bound to its store, with user and process log lists.
pub fn test_report_form(
    stores: &Stores,
    toasts: ToastBroadcaster,
    settings: &FormSettings,
) -> TestReportForm {
    let ttl = settings.reference_ttl();
    WizardForm::new(
        Arc::clone(&stores.steri_milk_test_reports),
        toasts,
        settings.refresh_delay(),
    )
    .with_provider(reference_provider(
        USERS,
        &stores.users,
        ttl,
        placeholder_users(),
    ))
    .with_provider(reference_provider(
        PROCESS_LOGS,
        &stores.steri_milk_process_logs,
        ttl,
        Vec::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incubation(start: &str, end: &str) -> IncubationDraft {
        IncubationDraft {
            batch_number: None,
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            ph: Some(6.6),
            result: Some("Negative".to_string()),
        }
    }

    fn filled() -> TestReportDraft {
        TestReportDraft {
            basic_info: ReportBasicInfo {
                issue_date: Some("2024-03-01".to_string()),
                approved_by: Some("u-2".to_string()),
                process_log_id: Some("log-1".to_string()),
                batch_number: Some(7),
                analyst_id: Some("u-3".to_string()),
            },
            details: SampleDetailsDraft {
                time: Some("09:15".to_string()),
                temperature: Some(21.0),
                ph: Some(6.7),
                ..SampleDetailsDraft::default()
            },
            organoleptic: OrganolepticDraft {
                colour: Some("White".to_string()),
                taste: Some("Normal".to_string()),
                odour: Some("Normal".to_string()),
                ..OrganolepticDraft::default()
            },
            incubation_37: incubation("10:00", "10:00"),
            incubation_55: incubation("10:05", "10:05"),
            sign_off: SignOffDraft {
                signature: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
                scientist_id: Some("u-4".to_string()),
                remarks: Some("  ".to_string()),
            },
        }
    }

    #[test]
    fn test_six_steps() {
        let keys: Vec<_> = TestReportDraft::steps().iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec![
                "basic_info",
                "details",
                "organoleptic",
                "incubation_37",
                "incubation_55",
                "sign_off"
            ]
        );
    }

    #[test]
    fn test_step_one_propagates_batch_and_analyst() {
        let mut draft = filled();
        draft.apply_derived(1);

        assert_eq!(draft.details.batch_number, Some(7));
        assert_eq!(draft.details.analyst_id.as_deref(), Some("u-3"));
        assert_eq!(draft.organoleptic.batch_number, Some(7));
        assert_eq!(draft.incubation_37.batch_number, Some(7));
        assert_eq!(draft.incubation_55.batch_number, Some(7));
    }

    #[test]
    fn test_into_spec_normalizes_signature() {
        let spec = filled().into_spec().unwrap();

        assert_eq!(spec.signature, "iVBORw0KGgo=");
        assert_eq!(spec.details.batch_number, 7);
        assert_eq!(spec.incubation_55.batch_number, 7);
        assert_eq!(spec.analyst_id, "u-3");
        assert!(spec.remarks.is_none());
    }

    #[test]
    fn test_ph_out_of_range_blocks_details() {
        let mut draft = filled();
        draft.details.ph = Some(14.5);
        let value = serde_json::to_value(&draft).unwrap();

        let errors = TestReportDraft::steps()[1].validate(&value).unwrap_err();
        assert_eq!(errors.get("details.ph"), Some("pH must be at most 14"));
    }

    #[test]
    fn test_bad_signature_is_rejected() {
        let mut draft = filled();
        draft.sign_off.signature = Some("scribble!".to_string());
        assert!(matches!(
            draft.into_spec(),
            Err(WizardError::InvalidSignature(_))
        ));
    }
}
