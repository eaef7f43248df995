//! Builders for backend rows and filled-in drafts.

#![allow(dead_code)]

use serde_json::{json, Map, Value};

use dairyops::entities::ProcessStage;
use dairyops::forms::{
    IncubationDraft, OrganolepticDraft, ProcessLogDraft, ReportBasicInfo, SampleDetailsDraft,
    SignOffDraft, TestReportDraft,
};

pub const SIGNATURE_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

pub fn machine_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2024-03-01T08:00:00Z",
        "updated_at": "2024-03-01T08:00:00Z",
        "name": name,
        "category": "filling",
        "location": "Hall A",
        "serial_number": format!("SN-{}", id)
    })
}

pub fn supplier_json(id: &str, company: &str) -> Value {
    json!({
        "id": id,
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "grace@example.com",
        "company_name": company,
        "phone_number": "+263 77 000 0000"
    })
}

pub fn user_json(id: &str, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "first_name": first,
        "last_name": last,
        "email": format!("{}@example.com", first.to_lowercase())
    })
}

pub fn filmatic_form_json(id: &str, date: &str) -> Value {
    json!({ "id": id, "date": date, "approved": true })
}

/// Stage time used for stage number `index`.
pub fn stage_time(index: usize) -> String {
    format!("08:{:02}", index * 4)
}

/// A process log draft with every step filled in, before step 3 defaults are applied.
pub fn process_log_draft(batch_number: u32) -> ProcessLogDraft {
    let mut draft = ProcessLogDraft::default();
    draft.basic_info.batch_number = Some(batch_number);
    draft.basic_info.approver_id = Some("u-1".to_string());
    draft.basic_info.filmatic_form_id = Some("f-1".to_string());
    for (i, stage) in ProcessStage::ALL.iter().enumerate() {
        draft.set_stage_time(*stage, stage_time(i));
        draft.set_temperature_input(*stage, "121");
        draft.set_pressure_input(*stage, "2.5");
    }
    draft
}

/// Server row for a process log as `process_log_draft` would submit it.
pub fn process_log_json(id: &str, batch_number: u32) -> Value {
    let mut batch = Map::new();
    let mut details = Map::new();
    batch.insert("batch_number".to_string(), json!(batch_number));
    for (i, stage) in ProcessStage::ALL.iter().enumerate() {
        batch.insert(stage.field().to_string(), json!(stage_time(i)));
        details.insert(
            stage.field().to_string(),
            json!({ "time": stage_time(i), "temperature": 121.0, "pressure": 2.5 }),
        );
    }

    json!({
        "id": id,
        "created_at": "2024-03-01T08:00:00Z",
        "updated_at": "2024-03-01T08:00:00Z",
        "approved": true,
        "approver_id": "u-1",
        "filmatic_form_id": "f-1",
        "batch": batch,
        "process_details": details
    })
}

fn incubation(start: &str, end: &str) -> IncubationDraft {
    IncubationDraft {
        batch_number: None,
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        ph: Some(6.6),
        result: Some("Negative".to_string()),
    }
}

/// A test report draft with every step filled in.
pub fn test_report_draft(process_log_id: &str, batch_number: u32) -> TestReportDraft {
    TestReportDraft {
        basic_info: ReportBasicInfo {
            issue_date: Some("2024-03-02".to_string()),
            approved_by: Some("u-2".to_string()),
            process_log_id: Some(process_log_id.to_string()),
            batch_number: Some(batch_number),
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
            coagulation: false,
            ..OrganolepticDraft::default()
        },
        incubation_37: incubation("10:00", "10:00"),
        incubation_55: incubation("10:05", "10:05"),
        sign_off: SignOffDraft {
            signature: Some(SIGNATURE_DATA_URL.to_string()),
            scientist_id: Some("u-4".to_string()),
            remarks: None,
        },
    }
}

/// Server row for a test report on `process_log_id`.
pub fn test_report_json(id: &str, process_log_id: &str, batch_number: u32) -> Value {
    let incubation = |start: &str| {
        json!({
            "batch_number": batch_number,
            "start_time": start,
            "end_time": start,
            "ph": 6.6,
            "result": "Negative"
        })
    };

    json!({
        "id": id,
        "issue_date": "2024-03-02",
        "approved_by": "u-2",
        "process_log_id": process_log_id,
        "analyst_id": "u-3",
        "details": {
            "batch_number": batch_number,
            "analyst_id": "u-3",
            "time": "09:15",
            "temperature": 21.0,
            "ph": 6.7
        },
        "organoleptic": {
            "batch_number": batch_number,
            "colour": "White",
            "taste": "Normal",
            "odour": "Normal",
            "coagulation": false
        },
        "incubation_37": incubation("10:00"),
        "incubation_55": incubation("10:05"),
        "signature": "iVBORw0KGgo=",
        "scientist_id": "u-4"
    })
}
