//! Workflow command - run workflows and inspect runs.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use dify_client::{DifyResponse, WorkflowLogsQuery, WorkflowRunRequest};

use super::output::{print_body, print_events};
use super::{Context, parse_input};

/// Arguments for the workflow command.
#[derive(Args, Debug)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowCommand {
    /// Run the app's workflow
    Run {
        /// Workflow input variable (key=value, repeatable)
        #[arg(short, long = "input", value_parser = parse_input)]
        inputs: Vec<(String, serde_json::Value)>,

        /// Stream node and text events as they happen
        #[arg(short, long)]
        stream: bool,
    },

    /// Show the status of a workflow run
    Status {
        /// Workflow run id
        run_id: String,
    },

    /// Stop a streaming workflow run
    Stop {
        /// Task id from the stream's events
        task_id: String,
    },

    /// List workflow run logs
    Logs {
        /// Filter by keyword
        #[arg(short, long)]
        keyword: Option<String>,

        /// Filter by status (succeeded, failed, stopped)
        #[arg(long)]
        status: Option<String>,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Entries per page
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

/// Run the workflow command.
pub async fn run(args: WorkflowArgs, ctx: &Context) -> Result<()> {
    match args.command {
        WorkflowCommand::Run { inputs, stream } => cmd_run(ctx, inputs, stream).await,
        WorkflowCommand::Status { run_id } => cmd_status(ctx, &run_id).await,
        WorkflowCommand::Stop { task_id } => cmd_stop(ctx, &task_id).await,
        WorkflowCommand::Logs {
            keyword,
            status,
            page,
            limit,
        } => cmd_logs(ctx, keyword, status, page, limit).await,
    }
}

async fn cmd_run(ctx: &Context, inputs: Vec<(String, serde_json::Value)>, stream: bool) -> Result<()> {
    let client = ctx.client()?;

    let mut request = WorkflowRunRequest::new(Default::default(), ctx.user()?).streaming(stream);
    for (key, value) in inputs {
        request = request.input(key, value);
    }

    match client.workflows().run(request).await? {
        DifyResponse::Streaming(stream) => print_events(stream, "text", ctx.json_output).await,
        DifyResponse::Buffered(response) => {
            if ctx.json_output {
                return print_body(&response);
            }
            let data = &response.body()["data"];
            let dim = Style::new().dim();
            println!(
                "{}",
                dim.apply_to(format!(
                    "[workflow: {}]",
                    data["status"].as_str().unwrap_or("unknown")
                ))
            );
            println!("{}", serde_json::to_string_pretty(&data["outputs"])?);
            Ok(())
        }
    }
}

async fn cmd_status(ctx: &Context, run_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let response = client.workflows().status(run_id).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let body = response.body();
    println!("Run:     {}", run_id);
    println!("Status:  {}", body["status"].as_str().unwrap_or("unknown"));
    if let Some(steps) = body["total_steps"].as_u64() {
        println!("Steps:   {}", steps);
    }
    if let Some(elapsed) = body["elapsed_time"].as_f64() {
        println!("Elapsed: {:.2}s", elapsed);
    }
    if let Some(error) = body["error"].as_str().filter(|e| !e.is_empty()) {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("Error:"), error);
    }
    Ok(())
}

async fn cmd_stop(ctx: &Context, task_id: &str) -> Result<()> {
    let client = ctx.client()?;
    let response = client.workflows().stop(task_id, &ctx.user()?).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let green = Style::new().green();
    println!("{} Stopped task {}", green.apply_to("✓"), task_id);
    Ok(())
}

async fn cmd_logs(
    ctx: &Context,
    keyword: Option<String>,
    status: Option<String>,
    page: u32,
    limit: Option<u32>,
) -> Result<()> {
    let client = ctx.client()?;

    let mut query = WorkflowLogsQuery::new().page(page);
    if let Some(keyword) = keyword {
        query = query.keyword(keyword);
    }
    if let Some(status) = status {
        query = query.status(status);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let response = client.workflows().logs(query).await?;

    if ctx.json_output {
        return print_body(&response);
    }

    let logs = response.body()["data"].as_array().cloned().unwrap_or_default();
    if logs.is_empty() {
        println!("No workflow logs found.");
        return Ok(());
    }

    println!("{:<38} {:<10} STEPS", "RUN", "STATUS");
    for log in &logs {
        let run = &log["workflow_run"];
        println!(
            "{:<38} {:<10} {}",
            run["id"].as_str().unwrap_or("-"),
            run["status"].as_str().unwrap_or("-"),
            run["total_steps"].as_u64().unwrap_or(0)
        );
    }
    Ok(())
}
