use crate::arc_path;

use super::Fs;

#[tokio::test]
async fn test_fs_write_and_read() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = arc_path(temp_dir.path().join("test_fs_write_and_read.txt"));

    let fs = Fs::spawn();
    fs.write(path.clone(), "first".into()).await.unwrap();
    fs.write(path.clone(), "second".into()).await.unwrap();

    assert_eq!(fs.read_to_string(path).await.unwrap(), "second");
    temp_dir.close().unwrap();
}

#[tokio::test]
async fn test_fs_append_creates_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = arc_path(temp_dir.path().join("test_fs_append.log"));

    let fs = Fs::spawn();
    fs.append(path.clone(), "a\n".into()).await.unwrap();
    fs.append(path.clone(), "b\n".into()).await.unwrap();

    assert_eq!(fs.read_to_string(path).await.unwrap(), "a\nb\n");
    temp_dir.close().unwrap();
}

#[tokio::test]
async fn test_fs_mkdir_read_dir_remove() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = arc_path(temp_dir.path().join("nested").join("dir"));
    let file = arc_path(dir.join("file.txt"));

    let fs = Fs::spawn();
    fs.mkdir(dir.clone()).await.unwrap();
    assert!(fs.read_dir(dir.clone()).await.unwrap().is_empty());

    fs.write(file.clone(), "x".into()).await.unwrap();
    let entries = fs.read_dir(dir.clone()).await.unwrap();
    assert_eq!(entries.len(), 1);

    fs.remove_file(file).await.unwrap();
    assert!(fs.read_dir(dir).await.unwrap().is_empty());
    temp_dir.close().unwrap();
}

#[tokio::test]
async fn test_fs_read_missing_file() {
    let fs = Fs::spawn();
    let result = fs.read_to_string(arc_path("/definitely/not/here.toml")).await;
    assert!(matches!(result, Err(e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[tokio::test]
async fn test_mock_fs_roundtrip() {
    let fs = Fs::mock();
    let path = arc_path("/tmp/articles/config.toml");

    fs.write(path.clone(), "log_level = \"Info\"".into())
        .await
        .unwrap();
    assert_eq!(
        fs.read_to_string(path).await.unwrap(),
        "log_level = \"Info\""
    );
}

#[tokio::test]
async fn test_mock_fs_read_dir_entries_are_reusable() {
    let fs = Fs::mock();
    let dir = arc_path("/logs");
    fs.mkdir(dir.clone()).await.unwrap();
    fs.append(arc_path("/logs/a.log"), "line\n".into())
        .await
        .unwrap();

    let entries = fs.read_dir(dir.clone()).await.unwrap();
    assert_eq!(entries.len(), 1);
    let entry = entries.front().cloned().unwrap();
    assert_eq!(entry.to_str(), Some("/logs/a.log"));

    fs.remove_file(entry).await.unwrap();
    assert!(fs.read_dir(dir).await.unwrap().is_empty());
}
