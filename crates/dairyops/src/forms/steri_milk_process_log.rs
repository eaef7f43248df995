//! Three-step steri-milk process log form.
//!
//! 1. `basic_info`: batch number, approver, filmatic lines form
//! 2. `process_times`: start time of each autoclave stage
//! 3. `process_details`: time, temperature and pressure read at each stage

use std::sync::Arc;

use serde::Serialize;

use super::{placeholder_users, reference_provider, FILMATIC_FORMS, USERS};
use crate::broadcast::ToastBroadcaster;
use crate::config::FormSettings;
use crate::entities::{
    ProcessStage, Record, StageReading, StageSet, SteriMilkBatch, SteriMilkProcessLogSpec,
};
use crate::store::Stores;
use crate::wizard::{
    parse_numeric_input, FieldSchema, StepSchema, WizardDraft, WizardError, WizardForm,
};

pub type ProcessLogForm = WizardForm<ProcessLogDraft>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessLogBasicInfo {
    pub batch_number: Option<u32>,
    pub approver_id: Option<String>,
    pub filmatic_form_id: Option<String>,
    pub approved: bool,
}

impl Default for ProcessLogBasicInfo {
    fn default() -> Self {
        Self {
            batch_number: None,
            approver_id: None,
            filmatic_form_id: None,
            approved: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingDraft {
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessLogDraft {
    pub basic_info: ProcessLogBasicInfo,
    pub process_times: StageSet<Option<String>>,
    pub process_details: StageSet<ReadingDraft>,
}

impl ProcessLogDraft {
    pub fn set_stage_time(&mut self, stage: ProcessStage, time: impl Into<String>) {
        *self.process_times.get_mut(stage) = Some(time.into());
    }

    pub fn set_reading_time(&mut self, stage: ProcessStage, time: impl Into<String>) {
        self.process_details.get_mut(stage).time = Some(time.into());
    }

    /// Sets a reading's temperature from raw input; blank input clears it.
    pub fn set_temperature_input(&mut self, stage: ProcessStage, input: &str) {
        self.process_details.get_mut(stage).temperature = parse_numeric_input(input);
    }

    /// Sets a reading's pressure from raw input; blank input clears it.
    pub fn set_pressure_input(&mut self, stage: ProcessStage, input: &str) {
        self.process_details.get_mut(stage).pressure = parse_numeric_input(input);
    }
}

impl WizardDraft for ProcessLogDraft {
    type Spec = SteriMilkProcessLogSpec;

    const TITLE: &'static str = "Process log";

    fn steps() -> Vec<StepSchema> {
        let basic_info = StepSchema::new("basic_info", "Basic information")
            .field(
                FieldSchema::new("batch_number", "Batch number")
                    .required()
                    .min(1.0),
            )
            .field(FieldSchema::new("approver_id", "Approver").required())
            .field(FieldSchema::new("filmatic_form_id", "Filmatic lines form").required());

        let process_times = ProcessStage::ALL.iter().fold(
            StepSchema::new("process_times", "Process times"),
            |step, stage| step.field(FieldSchema::new(stage.field(), stage.label()).required().time()),
        );

        let process_details = ProcessStage::ALL.iter().fold(
            StepSchema::new("process_details", "Process details"),
            |step, stage| {
                let field = stage.field();
                let label = stage.label();
                step.field(
                    FieldSchema::new(format!("{}.time", field), format!("{} time", label))
                        .required()
                        .time(),
                )
                .field(
                    FieldSchema::new(
                        format!("{}.temperature", field),
                        format!("{} temperature", label),
                    )
                    .required()
                    .range(0.0, 200.0),
                )
                .field(
                    FieldSchema::new(
                        format!("{}.pressure", field),
                        format!("{} pressure", label),
                    )
                    .required()
                    .range(0.0, 50.0),
                )
            },
        );

        vec![basic_info, process_times, process_details]
    }

    fn from_record(record: &Record<SteriMilkProcessLogSpec>) -> Self {
        let spec = &record.spec;
        Self {
            basic_info: ProcessLogBasicInfo {
                batch_number: Some(spec.batch.batch_number),
                approver_id: Some(spec.approver_id.clone()),
                filmatic_form_id: Some(spec.filmatic_form_id.clone()),
                approved: spec.approved,
            },
            process_times: spec.batch.times.clone().map(|_, time| Some(time)),
            process_details: spec.process_details.clone().map(|_, reading| ReadingDraft {
                time: Some(reading.time),
                temperature: Some(reading.temperature),
                pressure: Some(reading.pressure),
            }),
        }
    }

    /// Reading times start out as the stage times from step 2.
    fn apply_derived(&mut self, step: usize) {
        if step != 2 {
            return;
        }
        for stage in ProcessStage::ALL {
            let reading = self.process_details.get_mut(stage);
            if reading.time.is_none() {
                reading.time = self.process_times.get(stage).clone();
            }
        }
    }

    fn into_spec(self) -> Result<SteriMilkProcessLogSpec, WizardError> {
        let basic = self.basic_info;
        let batch_number = basic
            .batch_number
            .ok_or(WizardError::MissingField("batch_number"))?;

        let times = self
            .process_times
            .try_map(|stage, time| time.ok_or(WizardError::MissingField(stage.field())))?;

        let process_details = self.process_details.try_map(
            |stage, reading| -> Result<StageReading, WizardError> {
                let missing = || WizardError::MissingField(stage.field());
                Ok(StageReading {
                    time: reading.time.ok_or_else(missing)?,
                    temperature: reading.temperature.ok_or_else(missing)?,
                    pressure: reading.pressure.ok_or_else(missing)?,
                })
            },
        )?;

        Ok(SteriMilkProcessLogSpec {
            approved: basic.approved,
            approver_id: basic
                .approver_id
                .ok_or(WizardError::MissingField("approver_id"))?,
            filmatic_form_id: basic
                .filmatic_form_id
                .ok_or(WizardError::MissingField("filmatic_form_id"))?,
            batch: SteriMilkBatch {
                batch_number,
                times,
            },
            process_details,
        })
    }
}

/// Process log form bound to its store, with approver and filmatic form lists.
pub fn process_log_form(
    stores: &Stores,
    toasts: ToastBroadcaster,
    settings: &FormSettings,
) -> ProcessLogForm {
    let ttl = settings.reference_ttl();
    WizardForm::new(
        Arc::clone(&stores.steri_milk_process_logs),
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
        FILMATIC_FORMS,
        &stores.filmatic_lines_forms,
        ttl,
        Vec::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled() -> ProcessLogDraft {
        let mut draft = ProcessLogDraft::default();
        draft.basic_info.batch_number = Some(42);
        draft.basic_info.approver_id = Some("u-1".to_string());
        draft.basic_info.filmatic_form_id = Some("f-1".to_string());
        for (i, stage) in ProcessStage::ALL.iter().enumerate() {
            draft.set_stage_time(*stage, format!("08:{:02}", i * 4));
            draft.set_temperature_input(*stage, "121.5");
            draft.set_pressure_input(*stage, "2.1");
        }
        draft
    }

    #[test]
    fn test_defaults_to_approved() {
        let draft = ProcessLogDraft::default();
        assert!(draft.basic_info.approved);
        assert_eq!(ProcessLogDraft::steps().len(), 3);
    }

    #[test]
    fn test_step_two_seeds_reading_times() {
        let mut draft = filled();
        draft.set_reading_time(ProcessStage::HeatingStart, "08:09");
        draft.apply_derived(2);

        assert_eq!(
            draft.process_details.filling_start.time.as_deref(),
            Some("08:00")
        );
        assert_eq!(
            draft.process_details.heating_start.time.as_deref(),
            Some("08:09")
        );
    }

    #[test]
    fn test_blank_temperature_fails_required() {
        let mut draft = filled();
        draft.apply_derived(2);
        draft.set_temperature_input(ProcessStage::Cooling2Finish, "");

        let value = serde_json::to_value(&draft).unwrap();
        let errors = ProcessLogDraft::steps()[2].validate(&value).unwrap_err();
        assert_eq!(
            errors.get("process_details.cooling_2_finish.temperature"),
            Some("Cooling 2 finish temperature is required")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_into_spec_payload_shape() {
        let mut draft = filled();
        draft.apply_derived(2);

        let spec = draft.into_spec().unwrap();
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(value["approved"], json!(true));
        assert_eq!(value["batch"]["batch_number"], json!(42));
        assert_eq!(value["batch"]["filling_start"], json!("08:00"));
        assert_eq!(value["process_details"]["cooling_2_finish"]["pressure"], json!(2.1));
        assert!(value.get("basic_info").is_none());
    }

    #[test]
    fn test_into_spec_reports_missing_reading() {
        let draft = filled();
        let err = draft.into_spec().unwrap_err();
        assert!(matches!(err, WizardError::MissingField("filling_start")));
    }

    #[test]
    fn test_from_record_round_trips() {
        let mut draft = filled();
        draft.apply_derived(2);
        let spec = draft.clone().into_spec().unwrap();

        let seeded = ProcessLogDraft::from_record(&Record::new("log-1", spec));
        assert_eq!(seeded, draft);
    }
}
