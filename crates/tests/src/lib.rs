//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约测试（sink 工厂、emit/release 约定）
//! - 端到端测试：配置 -> 数据集 -> sink（无需 Kafka / Redis）

#[cfg(test)]
mod support {
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub const FIVE_ROW_CSV: &str = "INCIDENT_DISPATCH_ID,CITY,UNITS\n\
                                    101,San Francisco,3\n\
                                    102,San Francisco,1\n\
                                    103,Oakland,\n\
                                    104,Daly City,2\n\
                                    105,Berkeley,4\n";

    /// Writer whose bytes stay readable after the sink consumed it
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Write a JSON config pointing at `data_dir`
    pub fn write_config(dir: &Path, data_dir: &Path, extra: serde_json::Value) -> PathBuf {
        let mut config = serde_json::json!({
            "data_dir": data_dir,
            "dataset_file": "fire_incidents.csv",
            "output_strategy": "console",
        });
        if let (Some(base), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }

        let path = dir.join("settings.json");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        path
    }

    /// HTTP server answering every request with `body`; returns (url, hit counter)
    pub async fn serve_csv(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/rows.csv"), hits)
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{ContractError, OutputConfig, RecordSink, SinkKind};
    use dispatcher::SinkFactory;

    #[tokio::test]
    async fn test_factory_console_and_aliases() {
        let sink = SinkFactory::create(" Console ", &OutputConfig::default())
            .await
            .unwrap();
        assert_eq!(sink.kind(), SinkKind::Console);
        assert_eq!(sink.name(), "console");

        assert_eq!("kafka".parse::<SinkKind>().unwrap(), SinkKind::Queue);
        assert_eq!("redis".parse::<SinkKind>().unwrap(), SinkKind::Store);
    }

    #[tokio::test]
    async fn test_factory_unknown_identifier() {
        for identifier in ["", "file", "kafka2"] {
            let result = SinkFactory::create(identifier, &OutputConfig::default()).await;
            assert!(
                matches!(result, Err(ContractError::UnknownSinkType(_))),
                "identifier {identifier:?} was accepted"
            );
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::sync::atomic::Ordering;

    use csv_relay_cli::{CliError, RelayOptions, RelayPipeline};
    use dispatcher::{ConsoleSink, Dispatcher};
    use ingestion::DatasetStatus;
    use tempfile::TempDir;

    use super::support::{FIVE_ROW_CSV, SharedBuffer, serve_csv, write_config};

    /// End-to-end: present dataset, max_rows = 3, console sink
    ///
    /// 验证：
    /// 1. 数据集已存在时不发起下载
    /// 2. 只输出前 3 条记录
    #[tokio::test]
    async fn test_e2e_console_bounded_rows() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("fire_incidents.csv"), FIVE_ROW_CSV).unwrap();

        let (url, hits) = serve_csv(FIVE_ROW_CSV).await;
        let config = write_config(
            dir.path(),
            &data_dir,
            serde_json::json!({"dataset_url": url, "max_rows": 3}),
        );

        let output = SharedBuffer::default();
        let writer = output.clone();
        let stats = RelayPipeline::new(RelayOptions {
            config_path: config,
            ..RelayOptions::default()
        })
        .run_with(|identifier, options| async move {
            assert_eq!(identifier, "console");
            Ok(Dispatcher::new(ConsoleSink::with_writer(writer, &options.console)))
        })
        .await
        .unwrap();

        assert_eq!(stats.dataset, DatasetStatus::AlreadyPresent);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let report = stats.report.unwrap();
        assert_eq!(report.delivered, 3);
        let totals = stats.sink_metrics.unwrap();
        assert_eq!(totals.delivered_count, 3);
        assert_eq!(totals.failure_count, 0);

        let printed = output.contents();
        assert_eq!(printed.matches("Record #").count(), 3);
        assert!(printed.contains("  INCIDENT_DISPATCH_ID: 103"));
        assert!(printed.contains("  UNITS: null"));
        assert!(!printed.contains("104"));
    }

    /// End-to-end: download-only with no local dataset
    #[tokio::test]
    async fn test_e2e_download_only() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("fresh");
        let (url, hits) = serve_csv(FIVE_ROW_CSV).await;
        let config = write_config(dir.path(), &data_dir, serde_json::json!({"dataset_url": url}));

        let stats = RelayPipeline::new(RelayOptions {
            config_path: config,
            download_only: true,
            ..RelayOptions::default()
        })
        .run_with(|_, _| async {
            Err::<Dispatcher<ConsoleSink>, _>(dispatcher::DispatcherError::Contract(
                contracts::ContractError::Other("dispatch must not happen".to_string()),
            ))
        })
        .await
        .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            stats.dataset,
            DatasetStatus::Downloaded {
                bytes: FIVE_ROW_CSV.len() as u64
            }
        );
        assert_eq!(stats.records_loaded, 5);
        assert!(!stats.dispatched());
        assert_eq!(
            fs::read_to_string(data_dir.join("fire_incidents.csv")).unwrap(),
            FIVE_ROW_CSV
        );
    }

    /// End-to-end: nonexistent config path fails before download, parse or dispatch
    #[tokio::test]
    async fn test_e2e_missing_config() {
        let dir = TempDir::new().unwrap();
        let built = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = std::sync::Arc::clone(&built);

        let result = RelayPipeline::new(RelayOptions {
            config_path: dir.path().join("missing.json"),
            data_dir: Some(dir.path().join("data")),
            ..RelayOptions::default()
        })
        .run_with(|_, options| async move {
            flag.store(true, Ordering::SeqCst);
            Ok(Dispatcher::new(ConsoleSink::with_writer(
                SharedBuffer::default(),
                &options.console,
            )))
        })
        .await;

        assert!(matches!(result, Err(CliError::ConfigNotFound { .. })));
        assert!(!built.load(Ordering::SeqCst));
        assert!(!dir.path().join("data").exists());
    }
}
