//! Streaming HTML document transformation.
//!
//! [`transform_body`] runs an upstream body through a `lol_html` rewriter
//! in a spawned task. Output is forwarded frame by frame through a
//! bounded channel, so the document is never held in memory as a whole
//! and a slow client back-pressures the upstream read.
//!
//! The element rules live in [`meta`], [`head`] and [`body`] as plain
//! functions; the handlers here only read attributes and apply results.

pub mod body;
pub mod head;
pub mod meta;

use std::sync::{Arc, Mutex, PoisonError};

use axum::body::{Body, HttpBody};
use bytes::Bytes;
use http_body_util::BodyExt;
use lol_html::html_content::ContentType;
use lol_html::send::{HtmlRewriter, Settings};
use lol_html::element;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::model::DomainConfig;
use crate::error::GatewayError;

/// Transformed chunks buffered between the rewriter task and the client.
pub const CHANNEL_CAPACITY: usize = 16;

type Chunk = Result<Bytes, GatewayError>;

fn rewriter_settings(config: &Arc<DomainConfig>) -> Settings<'static, 'static> {
    let title_config = Arc::clone(config);
    let meta_config = Arc::clone(config);
    let head_config = Arc::clone(config);
    let body_config = Arc::clone(config);

    Settings {
        element_content_handlers: vec![
            element!("title", move |el| {
                if let Some(title) = meta::title_text(&title_config) {
                    el.set_inner_content(title, ContentType::Text);
                }
                Ok(())
            }),
            element!("meta", move |el| {
                let name = el.get_attribute("name");
                let property = el.get_attribute("property");
                let rewrite =
                    meta::meta_rewrite(name.as_deref(), property.as_deref(), &meta_config);
                if rewrite.remove {
                    el.remove();
                } else if let Some(content) = rewrite.content {
                    el.set_attribute("content", &content)?;
                }
                Ok(())
            }),
            element!("head", move |el| {
                el.append(&head::head_markup(&head_config), ContentType::Html);
                Ok(())
            }),
            element!("body", move |el| {
                el.append(&body::body_markup(&body_config)?, ContentType::Html);
                Ok(())
            }),
        ],
        ..Settings::new_send()
    }
}

fn take(buffer: &Mutex<Vec<u8>>) -> Bytes {
    let mut guard = buffer.lock().unwrap_or_else(PoisonError::into_inner);
    Bytes::from(std::mem::take(&mut *guard))
}

/// Wrap `upstream` so its HTML is rewritten for `config` as it streams.
pub fn transform_body<B>(upstream: B, config: Arc<DomainConfig>) -> Body
where
    B: HttpBody<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
{
    let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_CAPACITY);
    tokio::spawn(pump(upstream, config, tx));
    Body::from_stream(ReceiverStream::new(rx))
}

async fn pump<B>(mut upstream: B, config: Arc<DomainConfig>, tx: mpsc::Sender<Chunk>)
where
    B: HttpBody<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
{
    let output = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&output);
    let mut rewriter = HtmlRewriter::new(rewriter_settings(&config), move |chunk: &[u8]| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(chunk);
    });

    while let Some(frame) = upstream.frame().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                let err = GatewayError::upstream(e);
                tracing::warn!(domain = %config.domain, error = %err, "upstream body failed mid-stream");
                let _ = tx.send(Err(err)).await;
                return;
            }
        };
        let Ok(data) = frame.into_data() else {
            continue;
        };
        if let Err(e) = rewriter.write(&data) {
            tracing::error!(domain = %config.domain, error = %e, "html rewriting failed");
            let _ = tx
                .send(Err(GatewayError::Rewrite { source: Box::new(e) }))
                .await;
            return;
        }
        let chunk = take(&output);
        if !chunk.is_empty() && tx.send(Ok(chunk)).await.is_err() {
            tracing::debug!(domain = %config.domain, "client went away during transform");
            return;
        }
    }

    if let Err(e) = rewriter.end() {
        tracing::error!(domain = %config.domain, error = %e, "html rewriting failed at end of document");
        let _ = tx
            .send(Err(GatewayError::Rewrite { source: Box::new(e) }))
            .await;
        return;
    }
    let chunk = take(&output);
    if !chunk.is_empty() {
        let _ = tx.send(Ok(chunk)).await;
    }
}

/// Rewrite a complete document in one call.
pub fn transform_document(html: &str, config: &DomainConfig) -> Result<String, GatewayError> {
    let config = Arc::new(config.clone());
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = HtmlRewriter::new(rewriter_settings(&config), |chunk: &[u8]| {
        output.extend_from_slice(chunk);
    });
    rewriter
        .write(html.as_bytes())
        .map_err(|e| GatewayError::Rewrite { source: Box::new(e) })?;
    rewriter
        .end()
        .map_err(|e| GatewayError::Rewrite { source: Box::new(e) })?;
    String::from_utf8(output).map_err(|e| GatewayError::Rewrite { source: Box::new(e) })
}
