//! UseCase: メディアストリームの中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayStreamUseCase::resolve_stream_url() / stream_video()
//! - クライアントに渡す中継 URL の組み立てと、Range リクエストの転送
//!
//! ### なぜこのテストが必要か
//! - 中継 URL にオリジンの URL や API キーが含まれないことを保証
//! - Range ヘッダーが加工されずにオリジンへ渡ることを保証
//! - オリジンのステータス（206 / 404 など）がそのまま返ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：公開 URL あり / なしでの中継 URL
//! - 正常系：Range 付きリクエスト → 206 と Content-Range
//! - エッジケース：Accept-Ranges を返さないオリジン → bytes を補う

use std::sync::Arc;

use crate::domain::{ItemId, MediaOrigin, OriginResponse, RelayError};

const ACCEPT_RANGES_BYTES: &str = "bytes";

/// ストリーム中継のユースケース
pub struct RelayStreamUseCase {
    /// MediaOrigin（オリジンサーバーの抽象化）
    origin: Arc<dyn MediaOrigin>,
    /// クライアントから見えるこのサーバーのベース URL
    public_base_url: Option<String>,
}

impl RelayStreamUseCase {
    /// 新しい RelayStreamUseCase を作成
    pub fn new(origin: Arc<dyn MediaOrigin>, public_base_url: Option<String>) -> Self {
        let public_base_url =
            public_base_url.map(|url| url.trim_end_matches('/').to_string());
        Self {
            origin,
            public_base_url,
        }
    }

    /// クライアントに渡す中継 URL を返す
    ///
    /// 公開 URL が未設定の場合はサーバー相対パスを返す。
    pub fn resolve_stream_url(&self, item_id: &ItemId) -> String {
        let path = format!("/relay/items/{}/video", item_id);
        match &self.public_base_url {
            Some(base) => format!("{}{}", base, path),
            None => path,
        }
    }

    /// オリジンからストリームを開く
    ///
    /// ボディはまだ読まれておらず、呼び出し側がポーリングした分だけオリジンから
    /// 読み出される。ボディを drop するとオリジンへのリクエストも中断される。
    ///
    /// # Returns
    ///
    /// * `Ok(OriginResponse)` - オリジンのステータス・ヘッダー・ボディ（エラーステータスを含む）
    /// * `Err(RelayError)` - オリジンに到達できない、またはタイムアウト
    pub async fn stream_video(
        &self,
        item_id: &ItemId,
        range: Option<&[u8]>,
    ) -> Result<OriginResponse, RelayError> {
        let mut response = match self.origin.open_stream(item_id, range).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Relay of item '{}' failed: {}", item_id, e);
                return Err(e);
            }
        };

        if response.headers.accept_ranges.is_none() {
            response.headers.accept_ranges = Some(ACCEPT_RANGES_BYTES.to_string());
        }

        if response.status >= 400 {
            tracing::warn!(
                "Origin answered {} for item '{}', mirroring to client",
                response.status,
                item_id
            );
        } else {
            tracing::debug!(
                "Relaying item '{}' (status {}, range {:?})",
                item_id,
                response.status,
                range.map(String::from_utf8_lossy)
            );
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartialContentHeaders;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures_util::{StreamExt, stream};
    use std::sync::Mutex;
    use std::time::Duration;

    /// 受け取った Range を記録し、固定のレスポンスを返すオリジン
    struct FakeOrigin {
        status: u16,
        headers: PartialContentHeaders,
        failure: Option<RelayError>,
        seen_ranges: Mutex<Vec<Option<Vec<u8>>>>,
    }

    impl FakeOrigin {
        fn responding(status: u16, headers: PartialContentHeaders) -> Self {
            Self {
                status,
                headers,
                failure: None,
                seen_ranges: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: RelayError) -> Self {
            Self {
                status: 0,
                headers: PartialContentHeaders::default(),
                failure: Some(error),
                seen_ranges: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaOrigin for FakeOrigin {
        async fn open_stream(
            &self,
            _item_id: &ItemId,
            range: Option<&[u8]>,
        ) -> Result<OriginResponse, RelayError> {
            self.seen_ranges
                .lock()
                .unwrap()
                .push(range.map(<[u8]>::to_vec));
            if let Some(error) = &self.failure {
                return Err(error.clone());
            }
            Ok(OriginResponse {
                status: self.status,
                headers: self.headers.clone(),
                body: stream::iter(vec![Ok(Bytes::from_static(b"chunk"))]).boxed(),
            })
        }
    }

    fn item(id: &str) -> ItemId {
        ItemId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_resolve_stream_url_with_public_base() {
        // テスト項目: 公開 URL が設定されていれば絶対 URL を返す（末尾スラッシュは除去）
        // given (前提条件):
        let origin = Arc::new(FakeOrigin::responding(200, Default::default()));
        let usecase =
            RelayStreamUseCase::new(origin, Some("https://watch.example.com/".to_string()));

        // when (操作):
        let url = usecase.resolve_stream_url(&item("abc123"));

        // then (期待する結果):
        assert_eq!(url, "https://watch.example.com/relay/items/abc123/video");
    }

    #[test]
    fn test_resolve_stream_url_without_public_base() {
        // テスト項目: 公開 URL が無ければサーバー相対パスを返す
        let origin = Arc::new(FakeOrigin::responding(200, Default::default()));
        let usecase = RelayStreamUseCase::new(origin, None);

        assert_eq!(
            usecase.resolve_stream_url(&item("abc123")),
            "/relay/items/abc123/video"
        );
    }

    #[tokio::test]
    async fn test_range_is_forwarded_and_partial_content_preserved() {
        // テスト項目: Range がオリジンに渡り、206 と Content-Range がそのまま返る
        // given (前提条件):
        let headers = PartialContentHeaders {
            content_length: Some("1000".to_string()),
            content_range: Some("bytes 1000-1999/5000".to_string()),
            content_type: Some("video/mp4".to_string()),
            accept_ranges: Some("bytes".to_string()),
        };
        let origin = Arc::new(FakeOrigin::responding(206, headers.clone()));
        let usecase = RelayStreamUseCase::new(origin.clone(), None);

        // when (操作):
        let response = usecase
            .stream_video(&item("abc123"), Some(&b"bytes=1000-1999"[..]))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(response.status, 206);
        assert_eq!(response.headers, headers);
        assert_eq!(
            *origin.seen_ranges.lock().unwrap(),
            vec![Some(b"bytes=1000-1999".to_vec())]
        );
    }

    #[tokio::test]
    async fn test_accept_ranges_is_filled_in_when_origin_omits_it() {
        // テスト項目: オリジンが Accept-Ranges を返さなくても bytes が付く
        // given (前提条件):
        let origin = Arc::new(FakeOrigin::responding(200, Default::default()));
        let usecase = RelayStreamUseCase::new(origin.clone(), None);

        // when (操作):
        let mut response = usecase.stream_video(&item("abc123"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(response.headers.accept_ranges.as_deref(), Some("bytes"));
        assert_eq!(*origin.seen_ranges.lock().unwrap(), vec![None]);
        let chunk = response.body.next().await.unwrap().unwrap();
        assert_eq!(chunk, Bytes::from_static(b"chunk"));
    }

    #[tokio::test]
    async fn test_origin_error_status_is_mirrored() {
        // テスト項目: オリジンのエラーステータスはエラーではなくそのまま返る
        // given (前提条件):
        let origin = Arc::new(FakeOrigin::responding(404, Default::default()));
        let usecase = RelayStreamUseCase::new(origin, None);

        // when (操作):
        let response = usecase.stream_video(&item("missing"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_origin_failure_is_propagated() {
        // テスト項目: タイムアウトはそのまま RelayError として返る
        // given (前提条件):
        let origin = Arc::new(FakeOrigin::failing(RelayError::OriginTimeout(
            Duration::from_secs(30),
        )));
        let usecase = RelayStreamUseCase::new(origin, None);

        // when (操作):
        let result = usecase.stream_video(&item("abc123"), None).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::OriginTimeout(_))));
    }
}
