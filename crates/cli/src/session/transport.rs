// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for WebSocket communication.
//!
//! A [`Connector`] opens a fresh [`Transport`] for every connection attempt,
//! so a handle that failed or was released is never reused. The layer moves
//! raw text frames only; encoding and decoding happen in the controller.
//!
//! Provides:
//! - Real WebSocket connections for production
//! - Mock connectors and transports for unit testing

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by transport operations.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// A single established connection.
pub trait Transport: Send {
    /// Send a text frame.
    fn send(&mut self, text: String) -> TransportFuture<'_, ()>;

    /// Receive the next text frame.
    ///
    /// Returns `None` once the connection is closed. Must be cancel-safe: a
    /// dropped `recv` future loses no frame.
    fn recv(&mut self) -> TransportFuture<'_, Option<String>>;

    /// Close the connection gracefully.
    fn close(&mut self) -> TransportFuture<'_, ()>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

/// Opens transports.
pub trait Connector: Send + Sync {
    type Transport: Transport + 'static;

    /// Start connecting to `url`.
    ///
    /// The returned future does nothing until polled.
    fn connect(&self, url: &str) -> TransportFuture<'static, Self::Transport>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens [`WebSocketTransport`]s using tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Transport = WebSocketTransport;

    fn connect(&self, url: &str) -> TransportFuture<'static, WebSocketTransport> {
        let url = url.to_string();
        Box::pin(async move {
            use futures_util::StreamExt;

            let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            Ok(WebSocketTransport { ws: Some(WebSocketConnection { sink, stream }) })
        })
    }
}

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport {
    /// The WebSocket connection, cleared once it closes or breaks.
    ws: Option<WebSocketConnection>,
}

struct WebSocketConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

impl Transport for WebSocketTransport {
    fn send(&mut self, text: String) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            use futures_util::SinkExt;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            if let Err(e) = ws.sink.send(Message::Text(text.into())).await {
                self.ws = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }

            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<String>> {
        Box::pin(async move {
            use futures_util::StreamExt;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.stream.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
                    Some(Ok(Message::Close(_))) | None => {
                        self.ws = None;
                        return Ok(None);
                    }
                    Some(Ok(_)) => {
                        // Ping/pong and binary frames carry no chat content
                        continue;
                    }
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn close(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                ws.sink.close().await.map_err(|e| TransportError::SendFailed(e.to_string()))?;
            }
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}
