//! End-to-end runs of the downloader against a mock page server.

mod common;

use common::{DOC_ID, doc_id, listing, page_server, silent_server, test_config};
use page_dl::{DocumentId, DownloadRequest, Error, PageDownloader, RunState};

#[tokio::test]
async fn downloads_every_page_into_the_document_directory() {
    let server = page_server(DOC_ID, 3, &[]).await;
    let base = tempfile::tempdir().unwrap();
    let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

    let summary = downloader
        .run(DownloadRequest::new(doc_id(), 3))
        .await
        .unwrap();

    assert_eq!(summary.state, RunState::Done);
    assert!(summary.download.is_complete());
    let dir = base.path().join(DOC_ID);
    assert_eq!(listing(&dir), vec!["0.png", "1.png", "2.png"]);
    assert_eq!(
        std::fs::read(dir.join("2.png")).unwrap(),
        common::page_body(2)
    );
}

#[tokio::test]
async fn failed_page_leaves_a_gap_and_the_run_completes() {
    let server = page_server(DOC_ID, 4, &[2]).await;
    let base = tempfile::tempdir().unwrap();
    let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

    let summary = downloader
        .run(DownloadRequest::new(doc_id(), 4))
        .await
        .unwrap();

    assert_eq!(summary.state, RunState::Done);
    assert_eq!(summary.download.failed_pages(), vec![2]);
    assert_eq!(
        listing(&base.path().join(DOC_ID)),
        vec!["0.png", "1.png", "3.png"]
    );
}

#[tokio::test]
async fn rerun_reuses_the_directory_and_overwrites_pages() {
    let base = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        let server = page_server(DOC_ID, 2, &[]).await;
        let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();
        let summary = downloader
            .run(DownloadRequest::new(doc_id(), 2))
            .await
            .unwrap();
        assert!(summary.download.is_complete());
    }
    assert_eq!(listing(&base.path().join(DOC_ID)), vec!["0.png", "1.png"]);
}

#[test]
fn invalid_identifier_never_reaches_the_downloader() {
    let err = DocumentId::parse("not-a-uuid").unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier(_)));
}

#[tokio::test]
async fn zero_pages_creates_nothing_and_sends_nothing() {
    let server = silent_server().await;
    let base = tempfile::tempdir().unwrap();
    let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

    let err = downloader
        .run(DownloadRequest::new(doc_id(), 0))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Argument(_)));
    assert!(listing(base.path()).is_empty());
}

#[cfg(feature = "document")]
mod document {
    use super::*;

    fn pdf_page_count(path: &std::path::Path) -> usize {
        lopdf::Document::load(path).unwrap().get_pages().len()
    }

    #[tokio::test]
    async fn generates_a_document_with_one_page_per_image() {
        let server = page_server(DOC_ID, 3, &[]).await;
        let base = tempfile::tempdir().unwrap();
        let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

        let summary = downloader
            .run(DownloadRequest::new(doc_id(), 3).generate_document(true))
            .await
            .unwrap();

        let dir = base.path().join(DOC_ID);
        let pdf = dir.join(format!("{DOC_ID}.pdf"));
        assert_eq!(summary.document.unwrap().path, pdf);
        assert_eq!(pdf_page_count(&pdf), 3);
        assert_eq!(listing(&dir).len(), 4);
    }

    #[tokio::test]
    async fn remove_sources_leaves_only_the_document() {
        let server = page_server(DOC_ID, 3, &[]).await;
        let base = tempfile::tempdir().unwrap();
        let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

        downloader
            .run(
                DownloadRequest::new(doc_id(), 3)
                    .generate_document(true)
                    .remove_sources(true),
            )
            .await
            .unwrap();

        let dir = base.path().join(DOC_ID);
        assert_eq!(listing(&dir), vec![format!("{DOC_ID}.pdf")]);
        assert_eq!(pdf_page_count(&dir.join(format!("{DOC_ID}.pdf"))), 3);
    }

    #[tokio::test]
    async fn assembly_fails_on_a_gap_but_keeps_downloaded_pages() {
        let server = page_server(DOC_ID, 3, &[1]).await;
        let base = tempfile::tempdir().unwrap();
        let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

        let err = downloader
            .run(
                DownloadRequest::new(doc_id(), 3)
                    .generate_document(true)
                    .remove_sources(true),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Assembly(_)));
        assert_eq!(
            listing(&base.path().join(DOC_ID)),
            vec!["0.png", "2.png"]
        );
    }
}

#[cfg(not(feature = "document"))]
#[tokio::test]
async fn document_request_without_image_support_fails_before_download() {
    let server = silent_server().await;
    let base = tempfile::tempdir().unwrap();
    let downloader = PageDownloader::new(test_config(base.path(), &server.uri())).unwrap();

    let err = downloader
        .run(DownloadRequest::new(doc_id(), 3).generate_document(true))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotSupported(_)));
    assert!(listing(base.path()).is_empty());
}
