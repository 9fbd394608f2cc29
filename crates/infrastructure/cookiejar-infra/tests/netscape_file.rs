use camino::Utf8PathBuf;
use cookiejar_core::CookieQuery;
use cookiejar_infra::{open_cookie_source, CookieSource, NetscapeCookieFile};

const JAR: &str = "# Netscape HTTP Cookie File\n\
.example.com\tTRUE\t/\tFALSE\t0\tsid\troot\n\
www.example.com\tFALSE\t/account\tTRUE\t0\tsid\tdeep\n\
other.test\tFALSE\t/\tFALSE\t0\tsid\telsewhere\n";

#[tokio::test]
async fn reads_and_filters_a_cookies_txt_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("cookies.txt")).unwrap();
    std::fs::write(&path, JAR).unwrap();

    let source = open_cookie_source(&path);
    let found = source
        .get_all(&CookieQuery {
            name: "sid".into(),
            domain: Some("example.com".into()),
        })
        .await
        .unwrap();

    let values: Vec<_> = found.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, ["deep", "root"]);
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.txt")).unwrap();
    let res = NetscapeCookieFile::new(path)
        .get_all(&CookieQuery {
            name: "sid".into(),
            domain: None,
        })
        .await;
    assert!(res.is_err());
}
