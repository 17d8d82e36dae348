use anyhow::{bail, Context};
use gke_operator::config::{load_dotenv, OperatorSettings};
use gke_operator::exec::{CommandExecutor, ConfigMapper, ProcessCommandExecutor};
use gke_operator::operators::gke::GKE_OPERATOR_TYPE;
use gke_operator::{GkePlugin, OperatorContext, OperatorRegistry, StandardOperators, TaskRequest};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let request_path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => bail!("usage: gke-operator <task-request.yml>"),
    };

    let settings = OperatorSettings::from_env()?;
    let text = std::fs::read_to_string(&request_path)
        .with_context(|| format!("reading task request {}", request_path))?;
    // YAML is a superset of JSON, so this reads both.
    let request: TaskRequest = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing task request {}", request_path))?;

    let exec: Arc<dyn CommandExecutor> = Arc::new(ProcessCommandExecutor::new());
    let mapper = ConfigMapper::new();
    let mut registry = OperatorRegistry::new();
    registry.register_provider(&StandardOperators::new(Arc::clone(&exec), mapper.clone()));
    registry.register_provider(&GkePlugin::new(exec, mapper, settings));

    let project_path = std::env::current_dir().context("resolving project directory")?;
    info!(
        "🚀 Running task '{}' of workflow '{}'",
        request.task_name, request.workflow_name
    );
    let context = OperatorContext::new(project_path, request);
    let result = registry.run_task(GKE_OPERATOR_TYPE, context).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
