//! `std::net`-backed datagram stack
//!
//! Implements the console's collaborator contract over a plain
//! `std::net::UdpSocket`. Inbound delivery runs on a dedicated receive
//! thread per open socket; the thread polls with a short read timeout so a
//! close can stop it promptly. `bind` recreates the OS socket at the
//! requested endpoint, since a bound `UdpSocket` cannot be rebound in place.

use std::io::ErrorKind;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use dgramsh_core::{Datagram, DatagramStack, Endpoint, ReceiveHandler, StackError};

/// Poll interval at which the receive thread rechecks its stop flag
const RECV_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Receive buffer sized for the largest possible UDP payload
const RECV_BUFFER_SIZE: usize = 65_535;

// ----------------------------------------------------------------------------
// Socket Handle
// ----------------------------------------------------------------------------

/// Socket handle owned by the console; `Default` is the unopened state
#[derive(Default)]
pub struct NetSocket {
    inner: Option<Arc<UdpSocket>>,
    handler: Option<Arc<Mutex<ReceiveHandler>>>,
    running: Option<Arc<AtomicBool>>,
    receiver: Option<JoinHandle<()>>,
}

impl NetSocket {
    fn stop_receiver(&mut self) {
        if let Some(running) = self.running.take() {
            running.store(false, Ordering::Relaxed);
        }
        if let Some(receiver) = self.receiver.take() {
            let _ = receiver.join();
        }
        self.inner = None;
    }
}

impl Drop for NetSocket {
    fn drop(&mut self) {
        self.stop_receiver();
    }
}

// ----------------------------------------------------------------------------
// Stack
// ----------------------------------------------------------------------------

/// Datagram stack over the host's UDP sockets
#[derive(Default)]
pub struct NetStack;

impl NetStack {
    pub fn new() -> Self {
        Self
    }
}

impl DatagramStack for NetStack {
    type Socket = NetSocket;
    type Message = Vec<u8>;

    fn open(&mut self, socket: &mut NetSocket, handler: ReceiveHandler) -> Result<(), StackError> {
        if socket.inner.is_some() {
            return Err(StackError::AlreadyOpen);
        }
        let handler = Arc::new(Mutex::new(handler));
        let udp = open_socket(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0))?;
        if let Ok(local) = udp.local_addr() {
            info!(%local, "socket opened");
        }
        socket.handler = Some(handler.clone());
        attach(socket, udp, handler);
        Ok(())
    }

    fn bind(&mut self, socket: &mut NetSocket, local: Endpoint) -> Result<(), StackError> {
        let handler = socket.handler.clone().ok_or(StackError::NotOpen)?;
        let udp = open_socket(SocketAddrV6::new(local.addr, local.port, 0, 0))?;
        socket.stop_receiver();
        info!(%local, "socket bound");
        attach(socket, udp, handler);
        Ok(())
    }

    fn connect(&mut self, socket: &mut NetSocket, peer: Endpoint) -> Result<(), StackError> {
        let udp = socket.inner.as_ref().ok_or(StackError::NotOpen)?;
        udp.connect(SocketAddrV6::new(peer.addr, peer.port, 0, 0))?;
        info!(%peer, "socket connected");
        Ok(())
    }

    fn close(&mut self, socket: &mut NetSocket) -> Result<(), StackError> {
        // Close on an unopened socket is a no-op.
        socket.handler = None;
        socket.stop_receiver();
        debug!("socket closed");
        Ok(())
    }

    fn new_message(&mut self) -> Option<Vec<u8>> {
        Some(Vec::new())
    }

    fn send(
        &mut self,
        socket: &mut NetSocket,
        message: Vec<u8>,
        peer: Option<Endpoint>,
    ) -> Result<(), StackError> {
        let udp = socket.inner.as_ref().ok_or(StackError::NotOpen)?;
        let sent = match peer {
            Some(peer) => udp.send_to(&message, SocketAddrV6::new(peer.addr, peer.port, 0, 0))?,
            None => udp.send(&message)?,
        };
        debug!(bytes = sent, "datagram sent");
        Ok(())
    }
}

fn open_socket(local: SocketAddrV6) -> Result<Arc<UdpSocket>, StackError> {
    let socket = UdpSocket::bind(local)?;
    socket.set_read_timeout(Some(RECV_POLL_INTERVAL))?;
    Ok(Arc::new(socket))
}

fn attach(socket: &mut NetSocket, udp: Arc<UdpSocket>, handler: Arc<Mutex<ReceiveHandler>>) {
    let running = Arc::new(AtomicBool::new(true));
    socket.receiver = Some(spawn_receiver(udp.clone(), handler, running.clone()));
    socket.running = Some(running);
    socket.inner = Some(udp);
}

fn spawn_receiver(
    udp: Arc<UdpSocket>,
    handler: Arc<Mutex<ReceiveHandler>>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        while running.load(Ordering::Relaxed) {
            match udp.recv_from(&mut buf) {
                Ok((count, from)) => {
                    let peer = match from {
                        SocketAddr::V6(v6) => Endpoint::new(*v6.ip(), v6.port()),
                        SocketAddr::V4(v4) => Endpoint::new(v4.ip().to_ipv6_mapped(), v4.port()),
                    };
                    let datagram = Datagram::new(buf[..count].to_vec());
                    let mut callback = handler.lock().unwrap_or_else(PoisonError::into_inner);
                    (*callback)(&datagram, peer);
                }
                Err(error)
                    if error.kind() == ErrorKind::WouldBlock
                        || error.kind() == ErrorKind::TimedOut => {}
                Err(error) => {
                    warn!(%error, "receive loop terminated");
                    break;
                }
            }
        }
    })
}
