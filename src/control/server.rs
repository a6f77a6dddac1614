// src/control/server.rs
//! TCP command server
//!
//! One command per connection, one reply, then close. Connections are
//! served concurrently up to the configured cap; past the cap the accept
//! loop waits for a slot.

use crate::config::NetworkConfig;
use crate::control::command::{Command, Reply};
use crate::control::framing::read_command;
use crate::error::{DeviceError, DeviceResult};
use crate::workout::WorkoutCoordinator;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Per-connection settings
#[derive(Debug, Clone, Copy)]
struct ConnectionLimits {
    max_command_bytes: usize,
    read_timeout: Duration,
}

pub struct CommandServer {
    listener: TcpListener,
    coordinator: Arc<WorkoutCoordinator>,
    slots: Arc<Semaphore>,
    limits: ConnectionLimits,
}

impl CommandServer {
    /// Bind the command socket. Failure here is fatal for the device.
    pub async fn bind(
        config: &NetworkConfig,
        coordinator: Arc<WorkoutCoordinator>,
    ) -> DeviceResult<Self> {
        let address = config.listen_socket_addr()?;
        let listener = TcpListener::bind(address).await.map_err(|source| DeviceError::Bind {
            address: config.listen_address.clone(),
            source,
        })?;

        Ok(Self {
            listener,
            coordinator,
            slots: Arc::new(Semaphore::new(config.max_concurrent_connections.max(1))),
            limits: ConnectionLimits {
                max_command_bytes: config.max_command_bytes,
                read_timeout: config.read_timeout(),
            },
        })
    }

    pub fn local_addr(&self) -> DeviceResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| DeviceError::io("query local address", e))
    }

    /// Accept connections until `shutdown` is cancelled, then wait for the
    /// connections in flight.
    pub async fn run(self, shutdown: CancellationToken) -> DeviceResult<()> {
        info!(address = %self.local_addr()?, "listening for commands");
        let connections = TaskTracker::new();

        loop {
            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                permit = self.slots.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let (stream, peer) = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                },
            };

            let coordinator = self.coordinator.clone();
            let limits = self.limits;
            connections.spawn(async move {
                if let Err(e) = handle_connection(stream, &coordinator, limits).await {
                    warn!(%peer, error = %e, "connection closed without reply");
                }
                drop(permit);
            });
        }

        connections.close();
        connections.wait().await;
        info!("command server stopped");
        Ok(())
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    coordinator: &WorkoutCoordinator,
    limits: ConnectionLimits,
) -> DeviceResult<()> {
    let text = read_command(&mut stream, limits.max_command_bytes, limits.read_timeout).await?;
    let command = Command::parse(&text);
    debug!(?command, "received command");

    match command {
        Command::Use => match coordinator.try_reserve() {
            Ok(reservation) => {
                let written = write_reply(&mut stream, Reply::Ok).await;
                match reservation.launch() {
                    Ok(launched) => info!(workout = launched.id, "workout started"),
                    Err(e) => warn!(reason = %e, "workout not started"),
                }
                written
            }
            Err(e) => {
                info!(reason = %e, "workout refused");
                write_reply(&mut stream, Reply::Busy).await
            }
        },
        Command::Act { payload } => {
            info!(%payload, "action received");
            write_reply(&mut stream, Reply::ActionAcknowledged).await
        }
        Command::Unknown(text) => {
            debug!(%text, "unknown command");
            write_reply(&mut stream, Reply::UnknownCommand).await
        }
    }
}

async fn write_reply<W>(writer: &mut W, reply: Reply) -> DeviceResult<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(reply.as_str().as_bytes())
        .await
        .map_err(|e| DeviceError::io("write reply", e))?;
    writer.shutdown().await.map_err(|e| DeviceError::io("close connection", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkoutConfig;
    use crate::control::client::send_command;
    use crate::device::RecordingSink;
    use crate::workout::OverlapPolicy;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn local_network() -> NetworkConfig {
        NetworkConfig {
            listen_address: "127.0.0.1:0".to_string(),
            ..Default::default()
        }
    }

    fn slow_workout() -> WorkoutConfig {
        WorkoutConfig {
            rep_duration: 60.0,
            overlap_policy: OverlapPolicy::Reject,
            ..Default::default()
        }
    }

    async fn start(
        coordinator: Arc<WorkoutCoordinator>,
    ) -> (SocketAddr, CancellationToken, tokio::task::JoinHandle<DeviceResult<()>>) {
        let server = CommandServer::bind(&local_network(), coordinator).await.unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server.run(shutdown.clone()));
        (addr, shutdown, handle)
    }

    #[tokio::test]
    async fn test_bind_failure_is_fatal() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = NetworkConfig {
            listen_address: taken.local_addr().unwrap().to_string(),
            ..Default::default()
        };
        let sink = Arc::new(RecordingSink::new());
        let coordinator = Arc::new(WorkoutCoordinator::new(slow_workout(), sink));

        let err = CommandServer::bind(&config, coordinator).await.err().unwrap();
        assert!(matches!(err, DeviceError::Bind { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_replies() {
        let sink = Arc::new(RecordingSink::new());
        let coordinator = Arc::new(WorkoutCoordinator::new(slow_workout(), sink));
        let (addr, shutdown, handle) = start(coordinator.clone()).await;

        let reply = send_command(addr, "act:curl", TIMEOUT).await.unwrap();
        assert_eq!(reply, "action acknowledged");
        assert_eq!(send_command(addr, "ping", TIMEOUT).await.unwrap(), "unknown command");
        assert_eq!(send_command(addr, "use", TIMEOUT).await.unwrap(), "ok");
        assert_eq!(send_command(addr, "use", TIMEOUT).await.unwrap(), "busy");
        assert_eq!(coordinator.active_workouts(), 1);

        shutdown.cancel();
        handle.await.unwrap().unwrap();
        coordinator.shutdown().await;
        assert_eq!(coordinator.active_workouts(), 0);
    }

    #[tokio::test]
    async fn test_use_starts_workout_after_reply() {
        let sink = Arc::new(RecordingSink::new());
        let coordinator = Arc::new(WorkoutCoordinator::new(slow_workout(), sink.clone()));
        let (addr, shutdown, handle) = start(coordinator.clone()).await;

        assert_eq!(send_command(addr, "use", TIMEOUT).await.unwrap(), "ok");

        tokio::time::timeout(TIMEOUT, async {
            while sink.frame_count() == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        shutdown.cancel();
        handle.await.unwrap().unwrap();
        coordinator.shutdown().await;
    }

    #[tokio::test]
    async fn test_write_reply_closes_stream() {
        let (mut client, mut server) = tokio::io::duplex(64);
        write_reply(&mut server, Reply::Busy).await.unwrap();

        let mut reply = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut client, &mut reply).await.unwrap();
        assert_eq!(reply, "busy");
    }
}
