//! Steri-milk process logs and test reports.

use serde::{Deserialize, Serialize};

use super::kind::ResourceKind;
use super::record::{Record, ResourceSpec};

/// Stages of a steri-milk autoclave cycle, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    FillingStart,
    AutoclaveStart,
    HeatingStart,
    HeatingFinish,
    SterilizationStart,
    SterilizationAfter5,
    SterilizationFinish,
    PreCoolingStart,
    PreCoolingFinish,
    Cooling1Start,
    Cooling1Finish,
    Cooling2Start,
    Cooling2Finish,
}

impl ProcessStage {
    pub const ALL: [ProcessStage; 13] = [
        ProcessStage::FillingStart,
        ProcessStage::AutoclaveStart,
        ProcessStage::HeatingStart,
        ProcessStage::HeatingFinish,
        ProcessStage::SterilizationStart,
        ProcessStage::SterilizationAfter5,
        ProcessStage::SterilizationFinish,
        ProcessStage::PreCoolingStart,
        ProcessStage::PreCoolingFinish,
        ProcessStage::Cooling1Start,
        ProcessStage::Cooling1Finish,
        ProcessStage::Cooling2Start,
        ProcessStage::Cooling2Finish,
    ];

    /// Field name used on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            ProcessStage::FillingStart => "filling_start",
            ProcessStage::AutoclaveStart => "autoclave_start",
            ProcessStage::HeatingStart => "heating_start",
            ProcessStage::HeatingFinish => "heating_finish",
            ProcessStage::SterilizationStart => "sterilization_start",
            ProcessStage::SterilizationAfter5 => "sterilization_after_5",
            ProcessStage::SterilizationFinish => "sterilization_finish",
            ProcessStage::PreCoolingStart => "pre_cooling_start",
            ProcessStage::PreCoolingFinish => "pre_cooling_finish",
            ProcessStage::Cooling1Start => "cooling_1_start",
            ProcessStage::Cooling1Finish => "cooling_1_finish",
            ProcessStage::Cooling2Start => "cooling_2_start",
            ProcessStage::Cooling2Finish => "cooling_2_finish",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessStage::FillingStart => "Filling start",
            ProcessStage::AutoclaveStart => "Autoclave start",
            ProcessStage::HeatingStart => "Heating start",
            ProcessStage::HeatingFinish => "Heating finish",
            ProcessStage::SterilizationStart => "Sterilization start",
            ProcessStage::SterilizationAfter5 => "Sterilization after 5 minutes",
            ProcessStage::SterilizationFinish => "Sterilization finish",
            ProcessStage::PreCoolingStart => "Pre-cooling start",
            ProcessStage::PreCoolingFinish => "Pre-cooling finish",
            ProcessStage::Cooling1Start => "Cooling 1 start",
            ProcessStage::Cooling1Finish => "Cooling 1 finish",
            ProcessStage::Cooling2Start => "Cooling 2 start",
            ProcessStage::Cooling2Finish => "Cooling 2 finish",
        }
    }
}

/// One value per process stage, serialized as an object keyed by stage field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSet<V> {
    pub filling_start: V,
    pub autoclave_start: V,
    pub heating_start: V,
    pub heating_finish: V,
    pub sterilization_start: V,
    pub sterilization_after_5: V,
    pub sterilization_finish: V,
    pub pre_cooling_start: V,
    pub pre_cooling_finish: V,
    pub cooling_1_start: V,
    pub cooling_1_finish: V,
    pub cooling_2_start: V,
    pub cooling_2_finish: V,
}

impl<V> StageSet<V> {
    pub fn get(&self, stage: ProcessStage) -> &V {
        match stage {
            ProcessStage::FillingStart => &self.filling_start,
            ProcessStage::AutoclaveStart => &self.autoclave_start,
            ProcessStage::HeatingStart => &self.heating_start,
            ProcessStage::HeatingFinish => &self.heating_finish,
            ProcessStage::SterilizationStart => &self.sterilization_start,
            ProcessStage::SterilizationAfter5 => &self.sterilization_after_5,
            ProcessStage::SterilizationFinish => &self.sterilization_finish,
            ProcessStage::PreCoolingStart => &self.pre_cooling_start,
            ProcessStage::PreCoolingFinish => &self.pre_cooling_finish,
            ProcessStage::Cooling1Start => &self.cooling_1_start,
            ProcessStage::Cooling1Finish => &self.cooling_1_finish,
            ProcessStage::Cooling2Start => &self.cooling_2_start,
            ProcessStage::Cooling2Finish => &self.cooling_2_finish,
        }
    }

    pub fn get_mut(&mut self, stage: ProcessStage) -> &mut V {
        match stage {
            ProcessStage::FillingStart => &mut self.filling_start,
            ProcessStage::AutoclaveStart => &mut self.autoclave_start,
            ProcessStage::HeatingStart => &mut self.heating_start,
            ProcessStage::HeatingFinish => &mut self.heating_finish,
            ProcessStage::SterilizationStart => &mut self.sterilization_start,
            ProcessStage::SterilizationAfter5 => &mut self.sterilization_after_5,
            ProcessStage::SterilizationFinish => &mut self.sterilization_finish,
            ProcessStage::PreCoolingStart => &mut self.pre_cooling_start,
            ProcessStage::PreCoolingFinish => &mut self.pre_cooling_finish,
            ProcessStage::Cooling1Start => &mut self.cooling_1_start,
            ProcessStage::Cooling1Finish => &mut self.cooling_1_finish,
            ProcessStage::Cooling2Start => &mut self.cooling_2_start,
            ProcessStage::Cooling2Finish => &mut self.cooling_2_finish,
        }
    }

    /// Converts every stage value, stopping at the first failure.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(ProcessStage, V) -> Result<U, E>,
    ) -> Result<StageSet<U>, E> {
        Ok(StageSet {
            filling_start: f(ProcessStage::FillingStart, self.filling_start)?,
            autoclave_start: f(ProcessStage::AutoclaveStart, self.autoclave_start)?,
            heating_start: f(ProcessStage::HeatingStart, self.heating_start)?,
            heating_finish: f(ProcessStage::HeatingFinish, self.heating_finish)?,
            sterilization_start: f(ProcessStage::SterilizationStart, self.sterilization_start)?,
            sterilization_after_5: f(ProcessStage::SterilizationAfter5, self.sterilization_after_5)?,
            sterilization_finish: f(ProcessStage::SterilizationFinish, self.sterilization_finish)?,
            pre_cooling_start: f(ProcessStage::PreCoolingStart, self.pre_cooling_start)?,
            pre_cooling_finish: f(ProcessStage::PreCoolingFinish, self.pre_cooling_finish)?,
            cooling_1_start: f(ProcessStage::Cooling1Start, self.cooling_1_start)?,
            cooling_1_finish: f(ProcessStage::Cooling1Finish, self.cooling_1_finish)?,
            cooling_2_start: f(ProcessStage::Cooling2Start, self.cooling_2_start)?,
            cooling_2_finish: f(ProcessStage::Cooling2Finish, self.cooling_2_finish)?,
        })
    }

    pub fn map<U>(self, mut f: impl FnMut(ProcessStage, V) -> U) -> StageSet<U> {
        match self.try_map(|stage, v| Ok::<U, std::convert::Infallible>(f(stage, v))) {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }
}

/// Time, temperature (°C) and pressure (bar) read at one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReading {
    pub time: String,
    pub temperature: f64,
    pub pressure: f64,
}

/// Batch section of a process log: the batch number plus the time each stage began.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteriMilkBatch {
    pub batch_number: u32,
    #[serde(flatten)]
    pub times: StageSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteriMilkProcessLogSpec {
    #[serde(default = "default_approved")]
    pub approved: bool,
    pub approver_id: String,
    pub filmatic_form_id: String,
    pub batch: SteriMilkBatch,
    pub process_details: StageSet<StageReading>,
}

fn default_approved() -> bool {
    true
}

impl ResourceSpec for SteriMilkProcessLogSpec {
    const KIND: ResourceKind = ResourceKind::SteriMilkProcessLog;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleDetails {
    pub batch_number: u32,
    pub analyst_id: String,
    pub time: String,
    pub temperature: f64,
    pub ph: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganolepticResult {
    pub batch_number: u32,
    pub colour: String,
    pub taste: String,
    pub odour: String,
    pub coagulation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncubationResult {
    pub batch_number: u32,
    pub start_time: String,
    pub end_time: String,
    pub ph: f64,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteriMilkTestReportSpec {
    pub issue_date: String,
    pub approved_by: String,
    pub process_log_id: String,
    pub analyst_id: String,
    pub details: SampleDetails,
    pub organoleptic: OrganolepticResult,
    pub incubation_37: IncubationResult,
    pub incubation_55: IncubationResult,
    /// Base64 PNG of the scientist's signature.
    pub signature: String,
    pub scientist_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl ResourceSpec for SteriMilkTestReportSpec {
    const KIND: ResourceKind = ResourceKind::SteriMilkTestReport;
}

pub type SteriMilkProcessLog = Record<SteriMilkProcessLogSpec>;
pub type SteriMilkTestReport = Record<SteriMilkTestReportSpec>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_fields_match_serialized_keys() {
        let set: StageSet<u8> = StageSet::default();
        let value = serde_json::to_value(&set).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), ProcessStage::ALL.len());
        for stage in ProcessStage::ALL {
            assert!(object.contains_key(stage.field()), "{}", stage.field());
        }
    }

    #[test]
    fn test_get_mut_targets_the_named_stage() {
        let mut set: StageSet<Option<&str>> = StageSet::default();
        *set.get_mut(ProcessStage::Cooling2Start) = Some("10:15");
        assert_eq!(set.cooling_2_start, Some("10:15"));
        assert_eq!(*set.get(ProcessStage::Cooling2Finish), None);
    }

    #[test]
    fn test_try_map_reports_first_failing_stage() {
        let mut set: StageSet<Option<u32>> = StageSet::default().map(|_, _: Option<u32>| Some(1));
        set.heating_finish = None;
        set.cooling_1_start = None;

        let err = set
            .try_map(|stage, v| v.ok_or(stage))
            .unwrap_err();
        assert_eq!(err, ProcessStage::HeatingFinish);
    }

    #[test]
    fn test_batch_flattens_stage_times() {
        let batch = SteriMilkBatch {
            batch_number: 42,
            times: StageSet::default().map(|stage, _: String| stage.field().to_string()),
        };
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["batch_number"], 42);
        assert_eq!(value["filling_start"], "filling_start");
        assert!(value.get("times").is_none());
    }
}
