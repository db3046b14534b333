use std::sync::{Arc, PoisonError};

use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::AppState;
use super::error::ApiError;
use crate::system::process::ProcessSnapshot;
use crate::system::summary::{SystemSummary, sample_system_summary};

#[derive(Serialize)]
struct ProcessList {
    processes: Vec<ProcessSnapshot>,
}

#[derive(Serialize)]
struct Message {
    message: String,
}

pub async fn list_processes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let collector = Arc::clone(&state.collector);
    let processes = web::block(move || {
        collector
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .processes()
    })
    .await?;

    tracing::info!(count = processes.len(), "listed processes");
    Ok(HttpResponse::Ok().json(ProcessList { processes }))
}

pub async fn terminate_process(
    state: web::Data<AppState>,
    pid: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let pid = pid.into_inner();
    if let Err(err) = state.terminator.terminate(pid).await {
        tracing::warn!(pid, %err, "terminate failed");
        return Err(err.into());
    }

    tracing::info!(pid, "process terminated");
    Ok(HttpResponse::Ok().json(Message {
        message: format!("Process {pid} terminated successfully."),
    }))
}

pub async fn system_summary(state: web::Data<AppState>) -> web::Json<SystemSummary> {
    let summary = sample_system_summary(state.cpu_window).await;
    tracing::info!(
        cpu = summary.total_cpu_usage,
        memory = summary.total_memory_usage,
        "sampled system summary"
    );
    web::Json(summary)
}
