use crate::generator::profile::{build_sensor_lines, GeneratorConfig};
use crate::gui_bridge::model::DashboardModel;
use crate::workflow::runner::Runner;
use anyhow::Context;
use ndtcore::ingest::ManualEntry;
use ndtcore::NdtError;
use serde_json::json;
use std::future::Future;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

fn internal(err: anyhow::Error) -> Rejection {
    log::error!("bridge request failed: {:#}", err);
    warp::reject::custom(BridgeError)
}

fn error_reply(status: StatusCode, message: &str) -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "message": message})),
        status,
    )
}

/// Maps session-level rejections to client replies; anything else is internal.
/// A malformed sensor line is acknowledged as dropped rather than reported as an error.
fn ndt_error_reply(err: anyhow::Error) -> Result<WithStatus<Json>, Rejection> {
    let status = match err.downcast_ref::<NdtError>() {
        Some(NdtError::MissingLocation) => StatusCode::BAD_REQUEST,
        Some(NdtError::MalformedSensorLine { .. }) => {
            return Ok(warp::reply::with_status(
                warp::reply::json(&json!({"status": "dropped"})),
                StatusCode::ACCEPTED,
            ))
        }
        Some(NdtError::NotRecording) => StatusCode::CONFLICT,
        None => return Err(internal(err)),
    };
    Ok(error_reply(status, &err.to_string()))
}

/// HTTP bridge exposing the inspection session to the dashboard front-end.
pub struct GuiBridge {
    runner: Runner,
}

impl GuiBridge {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let runner = self.runner.clone();
        let with_runner = warp::any().map(move || runner.clone());
        let text_body = warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes());

        let summary = warp::path!("summary")
            .and(warp::get())
            .and(with_runner.clone())
            .and_then(get_summary);

        let list_records = warp::path!("records")
            .and(warp::get())
            .and(with_runner.clone())
            .and_then(list_records);

        let add_record = warp::path!("records")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::json())
            .and(with_runner.clone())
            .and_then(add_record);

        let sensor = warp::path!("sensor")
            .and(warp::post())
            .and(text_body.clone())
            .and(with_runner.clone())
            .and_then(record_sensor_line);

        let import = warp::path!("import")
            .and(warp::post())
            .and(text_body)
            .and(with_runner.clone())
            .and_then(import_csv);

        let synthetic = warp::path!("synthetic")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::json())
            .and(with_runner.clone())
            .and_then(record_synthetic);

        let start = warp::path!("recording" / "start")
            .and(warp::post())
            .and(with_runner.clone())
            .and_then(start_recording);

        let stop = warp::path!("recording" / "stop")
            .and(warp::post())
            .and(with_runner.clone())
            .and_then(stop_recording);

        let clear_live = warp::path!("live")
            .and(warp::delete())
            .and(with_runner.clone())
            .and_then(clear_live);

        let export = warp::path!("export")
            .and(warp::get())
            .and(with_runner)
            .and_then(export_csv);

        summary
            .or(list_records)
            .or(add_record)
            .or(sensor)
            .or(import)
            .or(synthetic)
            .or(start)
            .or(stop)
            .or(clear_live)
            .or(export)
    }

    /// Serves until `shutdown` resolves.
    pub async fn serve<S>(&self, shutdown: S) -> anyhow::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let bind = self.runner.config().bind_address;
        let (addr, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(bind, shutdown)
            .with_context(|| format!("binding dashboard bridge on {}", bind))?;
        self.publish_status(&format!("listening on http://{} (Ctrl+C to stop)", addr));
        server.await;
        Ok(())
    }

    pub fn publish(&self, model: &DashboardModel) {
        match &model.summary {
            Some(summary) => println!(
                "[BRIDGE] records: {}, risk: {}, grade: {}, signal: {}, defects: {}",
                model.record_count,
                summary.risk_level,
                summary.health_score,
                summary.signal_quality,
                summary.defects_found
            ),
            None => println!("[BRIDGE] records: {}, no analysis yet", model.record_count),
        }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[BRIDGE] {}", message);
    }
}

async fn get_summary(runner: Runner) -> Result<impl Reply, Rejection> {
    let model = {
        let session = runner.read().map_err(internal)?;
        DashboardModel::from_session(&session)
    };
    Ok(warp::reply::json(&model))
}

async fn list_records(runner: Runner) -> Result<impl Reply, Rejection> {
    let records = runner.read().map_err(internal)?.records().to_vec();
    Ok(warp::reply::json(&records))
}

async fn add_record(entry: ManualEntry, runner: Runner) -> Result<impl Reply, Rejection> {
    match runner.add_manual(entry).await {
        Ok(record) => Ok(warp::reply::with_status(
            warp::reply::json(&record),
            StatusCode::CREATED,
        )),
        Err(err) => ndt_error_reply(err),
    }
}

async fn record_sensor_line(body: Bytes, runner: Runner) -> Result<impl Reply, Rejection> {
    let line = String::from_utf8_lossy(&body);
    match runner.record_line(line.trim()) {
        Ok(record) => Ok(warp::reply::with_status(
            warp::reply::json(&record),
            StatusCode::CREATED,
        )),
        Err(err) => ndt_error_reply(err),
    }
}

async fn import_csv(body: Bytes, runner: Runner) -> Result<impl Reply, Rejection> {
    let text = String::from_utf8_lossy(&body).into_owned();
    let imported = runner.import_csv(&text).await.map_err(internal)?;
    Ok(warp::reply::json(&json!({"status": "ok", "imported": imported})))
}

async fn record_synthetic(
    config: GeneratorConfig,
    runner: Runner,
) -> Result<impl Reply, Rejection> {
    let lines = build_sensor_lines(&config);
    let report = runner
        .record_stream(lines.join("\n").as_bytes())
        .await
        .map_err(internal)?;
    Ok(warp::reply::json(&report))
}

async fn start_recording(runner: Runner) -> Result<impl Reply, Rejection> {
    runner.start_recording().map_err(internal)?;
    Ok(warp::reply::json(&json!({"status": "recording"})))
}

async fn stop_recording(runner: Runner) -> Result<impl Reply, Rejection> {
    let summary = runner.stop_recording().map_err(internal)?;
    Ok(warp::reply::json(&json!({"status": "stopped", "summary": summary})))
}

async fn clear_live(runner: Runner) -> Result<impl Reply, Rejection> {
    let removed = runner.clear_live().map_err(internal)?;
    if removed > 0 {
        runner.analyze().await.map_err(internal)?;
    }
    Ok(warp::reply::json(&json!({"status": "ok", "removed": removed})))
}

async fn export_csv(runner: Runner) -> Result<impl Reply, Rejection> {
    let (body, status) = match runner.export_csv().map_err(internal)? {
        Some(text) => (text, StatusCode::OK),
        None => (String::new(), StatusCode::NO_CONTENT),
    };
    Ok(warp::reply::with_header(
        warp::reply::with_status(body, status),
        "content-disposition",
        "attachment; filename=\"ndt_analysis_results.csv\"",
    ))
}
