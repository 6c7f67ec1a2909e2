//! Demo driver: runs the classic workload through all four queue variants.

use std::time::Duration;

use sapiq_core::error::BoxError;
use sapiq_core::{SaiQueue, SaipQueue, SapiQueue, SapipQueue};
use tracing::info;

const DELAY: Duration = Duration::from_millis(100);
const LIMIT: usize = 10;

const EXAMPLE_DATA: [(&str, &str, i64); 17] = [
    ("1", "a", 2),
    ("1", "b", 3),
    ("2", "a", 2),
    ("2", "a", 1),
    ("3", "a", 2),
    ("3", "a", 3),
    ("4", "a", 1),
    ("4", "a", 1),
    ("5", "a", 2),
    ("5", "b", 2),
    ("6", "b", 1),
    ("6", "a", 1),
    ("7", "b", 1),
    ("7", "a", 0),
    ("8", "a", 1),
    ("8", "b", 0),
    ("8", "c", 2),
];

fn example_command(name: &String, data: &[String]) -> Result<String, BoxError> {
    info!(name = %name, data = %data.join(" "), "executing");
    Ok(format!("{} {} Finished!", name, data.join(" ")))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let sapip: SapipQueue = SapipQueue::new(example_command, LIMIT);
    let saip: SaipQueue = SaipQueue::new(example_command, LIMIT);
    let sapi: SapiQueue = SapiQueue::new(example_command, LIMIT);
    let sai: SaiQueue = SaiQueue::new(example_command, LIMIT);

    {
        let q = sapip.clone();
        tokio::spawn(async move { q.run(DELAY).await });
    }
    {
        let q = saip.clone();
        tokio::spawn(async move { q.run().await });
    }
    {
        let q = sapi.clone();
        tokio::spawn(async move { q.run(DELAY).await });
    }
    {
        let q = sai.clone();
        tokio::spawn(async move { q.run().await });
    }

    info!("testing SAPIP queue");
    let mut readers = Vec::new();
    for (name, data, priority) in EXAMPLE_DATA {
        let sr = sapip
            .add_element(name.to_string(), data.to_string(), priority)
            .await
            .expect("queue open");
        info!(name, data, priority, "insert");
        readers.push(tokio::spawn(async move {
            let result = sr.read().await;
            info!(result = %result, "SAPIP");
        }));
    }
    for r in readers {
        let _ = r.await;
    }
    info!(stats = %serde_json::to_string(&sapip.num_elements().await).expect("stats"), "SAPIP drained");

    info!("testing SAIP queue");
    let mut readers = Vec::new();
    for (name, data, priority) in EXAMPLE_DATA {
        let sr = saip
            .add_element(name.to_string(), data.to_string(), priority)
            .await
            .expect("queue open");
        info!(name, data, priority, "insert");
        readers.push(tokio::spawn(async move {
            let result = sr.read().await;
            info!(result = %result, "SAIP");
        }));
    }
    for r in readers {
        let _ = r.await;
    }

    info!("testing SAPI queue");
    let mut readers = Vec::new();
    for (name, data, _) in EXAMPLE_DATA {
        let sr = sapi
            .add_element(name.to_string(), vec![data.to_string()])
            .await
            .expect("queue open");
        info!(name, data, "insert");
        readers.push(tokio::spawn(async move {
            let result = sr.read().await;
            info!(result = %result, "SAPI");
        }));
    }
    for r in readers {
        let _ = r.await;
    }

    info!("testing SAI queue");
    let mut readers = Vec::new();
    for (name, data, _) in EXAMPLE_DATA {
        let sr = sai
            .add_element(name.to_string(), vec![data.to_string()])
            .await
            .expect("queue open");
        info!(name, data, "insert");
        readers.push(tokio::spawn(async move {
            let result = sr.read().await;
            info!(result = %result, "SAI");
        }));
    }
    for r in readers {
        let _ = r.await;
    }

    sapip.stop();
    saip.stop();
    sapi.stop();
    sai.stop();
}
