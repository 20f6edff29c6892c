use psbundle_core::{
    ConvertError, InputSource, READ_FAILURE_MESSAGE, convert, convert_file, encode_bytes,
    format_size, format_size_default, sanitize_name,
};
use psbundle_test_support::fixtures::{
    MZ_HEADER, MZ_HEADER_BASE64, sample_bytes, temp_dir, write_file,
};
use psbundle_test_support::sources::FailingReader;

#[tokio::test]
async fn executable_header_converts_end_to_end() -> anyhow::Result<()> {
    let source = InputSource::new("My App!.exe", &MZ_HEADER[..]).with_declared_size(4);
    let result = convert(source).await?;

    assert_eq!(sanitize_name("My App!.exe").as_str(), "My_App_.exe");
    assert_eq!(encode_bytes(&MZ_HEADER).as_str(), MZ_HEADER_BASE64);
    assert_eq!(result.file_name, "My App!.exe");
    assert_eq!(result.original_size, 4);

    let script = result.script.as_str();
    assert!(script.contains("$f = \"My_App_.exe\""));
    assert!(script.contains("$d = @\"\nTVqQAA==\n\"@"));
    assert_eq!(result.script_file_name(), "My App!.exe.ps1");
    Ok(())
}

#[tokio::test]
async fn payload_round_trips_through_script() -> anyhow::Result<()> {
    for len in [0, 1, 2, 3, 1024, 70_001] {
        let bytes = sample_bytes(len);
        let source = InputSource::new("blob.bin", bytes.as_slice());
        let result = convert(source).await?;

        let script = result.script.as_str();
        let start = script
            .find("$d = @\"\n")
            .map(|index| index + "$d = @\"\n".len())
            .ok_or_else(|| anyhow::anyhow!("missing here-string"))?;
        let end = script
            .find("\n\"@\n")
            .ok_or_else(|| anyhow::anyhow!("missing here-string terminator"))?;
        let embedded = &script[start..end];

        let decoded = psbundle_core::EncodedPayload::from_data_url(embedded)?.decode()?;
        assert_eq!(decoded, bytes, "round trip failed for {len} bytes");
    }
    Ok(())
}

#[tokio::test]
async fn failing_source_yields_single_read_failure() {
    let source = InputSource::new("broken.exe", FailingReader::after(MZ_HEADER.to_vec()));
    let outcome = convert(source).await;

    let Err(err) = outcome else {
        panic!("expected read failure, got a script");
    };
    assert!(err.is_read_failure());
    assert!(matches!(err, ConvertError::Read { .. }));
    assert_eq!(err.user_message(), READ_FAILURE_MESSAGE);
}

#[tokio::test]
async fn source_shorter_than_declared_is_rejected() {
    let source = InputSource::new("short.exe", &MZ_HEADER[..2]).with_declared_size(4);
    let outcome = convert(source).await;
    assert!(matches!(
        outcome,
        Err(ConvertError::Truncated {
            expected: 4,
            actual: 2,
            ..
        })
    ));
}

#[tokio::test]
async fn files_convert_under_their_own_name() -> anyhow::Result<()> {
    let dir = temp_dir()?;
    let path = write_file(dir.path(), "setup tool.exe", &sample_bytes(2048))?;

    let result = convert_file(&path).await?;
    assert_eq!(result.file_name, "setup tool.exe");
    assert_eq!(result.original_size, 2048);
    assert!(result.script.as_str().starts_with("$f = \"setup_tool.exe\"\n"));
    assert_eq!(format_size_default(result.original_size), "2 KB");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn named_pipes_convert_without_a_declared_size() -> anyhow::Result<()> {
    let dir = temp_dir()?;
    let path = dir.path().join("payload.exe");
    let status = std::process::Command::new("mkfifo").arg(&path).status()?;
    anyhow::ensure!(status.success(), "mkfifo failed");

    let writer_path = path.clone();
    let writer = std::thread::spawn(move || std::fs::write(writer_path, MZ_HEADER));

    let result = convert_file(&path).await?;
    writer
        .join()
        .map_err(|_| anyhow::anyhow!("fifo writer panicked"))??;

    assert_eq!(result.file_name, "payload.exe");
    assert_eq!(result.original_size, 4);
    assert!(result.script.as_str().contains(MZ_HEADER_BASE64));
    Ok(())
}

#[tokio::test]
async fn independent_conversions_run_concurrently() -> anyhow::Result<()> {
    let first = sample_bytes(300);
    let second = sample_bytes(301);
    let (left, right) = tokio::join!(
        convert(InputSource::new("a.exe", first.as_slice())),
        convert(InputSource::new("b.exe", second.as_slice())),
    );
    let (left, right) = (left?, right?);
    assert_eq!(left.original_size, 300);
    assert_eq!(right.original_size, 301);
    assert_ne!(left.script, right.script);
    Ok(())
}

#[test]
fn size_formatter_reference_values() {
    assert_eq!(format_size_default(0), "0 Bytes");
    assert_eq!(format_size_default(1024), "1 KB");
    assert_eq!(format_size(1536, 1), "1.5 KB");
    assert_eq!(format_size_default(1_073_741_824), "1 GB");
    assert_eq!(format_size(2560, 0), "3 KB");
    assert_eq!(format_size_default(1152), "1.13 KB");
}
