use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use athena::NetworkVersion;

use crate::dispatch::Dispatcher;
use crate::session::Session;
use crate::ServerInfo;

/// Socket adapter around the dispatcher and the session outbox.
///
/// Reading and writing stay on one task: the protocol layer is not
/// thread-safe by design, and the server never requires full-duplex
/// traffic within a single message exchange.
pub struct Connection {
    reader: OwnedReadHalf,
    writer: BufWriter<OwnedWriteHalf>,
    dispatcher: Dispatcher,
    read_buffer: Vec<u8>,
}

impl Connection {
    pub async fn connect(info: &ServerInfo, version: NetworkVersion)
        -> Result<Connection>
    {
        let stream = TcpStream::connect((info.hostname.as_str(), info.port))
            .await?;
        stream.set_nodelay(true)?;
        debug!("connected to {}:{} ({})", info.hostname, info.port,
            info.family);
        let (reader, writer) = stream.into_split();
        Ok(Connection {
            reader,
            writer: BufWriter::new(writer),
            dispatcher: Dispatcher::new(info.family, version),
            read_buffer: vec![0; 4096],
        })
    }

    /// Read once from the socket and dispatch every complete message.
    /// Returns `false` when the server has closed the connection.
    pub async fn poll(&mut self, sess: &mut Session) -> Result<bool> {
        let n = self.reader.read(&mut self.read_buffer).await?;
        if n == 0 {
            debug!("server closed the connection");
            return Ok(false);
        }
        let bytes = &self.read_buffer[..n];
        trace!("RECV {n} bytes");
        self.dispatcher.feed(sess, bytes)?;
        Ok(true)
    }

    /// Write out everything the handlers queued since the last flush.
    pub async fn flush(&mut self, sess: &mut Session) -> Result<()> {
        if sess.out.is_empty() {
            return Ok(());
        }
        for packet in sess.out.drain() {
            trace!("SEND {} bytes", packet.len());
            self.writer.write_all(&packet).await?;
        }
        self.writer.flush().await?;
        Ok(())
    }
}
