//! Server control plane (C8): `configured → running → stopped` lifecycle,
//! reactor pool management, and the optional admin `/ping` endpoint.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::net::TcpListener as TokioListener;
use tokio::runtime::Builder as RuntimeBuilder;
use tokio::sync::oneshot;

use crate::alias::{PCondvar, PMutex, PRwLock};
use crate::connection::context::handle_connection;
use crate::connection::reactor::ReactorPool;
use crate::debug_log;
use crate::error::{Result, WaypostError};
use crate::http::response::{Response, StatusCode};
use crate::matcher::ResourceMatcher;
use crate::resource::{Resource, ResourceBuilder, ResourceRegistry};

/// `K` in the source: the fixed worker reactor pool size.
pub const DEFAULT_REACTOR_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerState {
    Configured,
    Running,
    Stopped,
}

struct RunningListener {
    local_addr: SocketAddr,
    listener_shutdown: oneshot::Sender<()>,
    listener_thread: JoinHandle<()>,
}

/// A configured-but-not-yet-running, or running, or stopped HTTP server.
///
/// Registration (`register_resource`) must happen before `start`;
/// registering afterwards is undefined, matching the source's contract
/// that the matcher is effectively immutable once the reactors are live.
pub struct Server {
    addr: SocketAddr,
    reactor_count: usize,
    matcher: Arc<PRwLock<ResourceMatcher>>,
    registry: PMutex<ResourceRegistry>,
    state: PMutex<ServerState>,
    stopped_cvar: PCondvar,
    pool: PMutex<Option<Arc<ReactorPool>>>,
    listener: PMutex<Option<RunningListener>>,
    admin_listener: PMutex<Option<RunningListener>>,
}

impl Server {
    /// Constructs a configured server bound to `ip:port`. Fails with
    /// [`WaypostError::InvalidAddress`] if `ip` does not parse.
    pub fn new(ip: &str, port: u16) -> Result<Self> {
        let parsed: IpAddr =
            ip.parse().map_err(|_| WaypostError::InvalidAddress(ip.to_string()))?;
        Ok(Self {
            addr: SocketAddr::new(parsed, port),
            reactor_count: DEFAULT_REACTOR_COUNT,
            matcher: Arc::new(PRwLock::new(ResourceMatcher::new())),
            registry: PMutex::new(ResourceRegistry::new()),
            state: PMutex::new(ServerState::Configured),
            stopped_cvar: PCondvar::new(),
            pool: PMutex::new(None),
            listener: PMutex::new(None),
            admin_listener: PMutex::new(None),
        })
    }

    /// Overrides the worker reactor count (default [`DEFAULT_REACTOR_COUNT`]).
    /// Only meaningful before `start`.
    pub fn with_reactor_count(mut self, count: usize) -> Self {
        self.reactor_count = count.max(1);
        self
    }

    /// Registers a resource, introspecting its declared method bindings.
    /// Fails with [`WaypostError::TemplateCollision`] if an identically
    /// shaped template was already registered.
    pub fn register_resource(&self, resource: Resource) -> Result<()> {
        let resource = Arc::new(resource);
        self.matcher.write().register(resource.clone())?;
        self.registry.lock().push(resource);
        Ok(())
    }

    /// The number of resources registered so far.
    pub fn resource_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Starts accepting connections: spins up the worker reactor pool and
    /// the listener reactor. Fails with [`WaypostError::AlreadyStarted`]
    /// unless currently `configured`.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        if *state != ServerState::Configured {
            return Err(WaypostError::AlreadyStarted);
        }

        let pool = Arc::new(ReactorPool::start(self.reactor_count));
        let running = spawn_listener(self.addr, self.matcher.clone(), pool.clone())?;

        debug_log!("server listening on {}", running.local_addr);
        *self.pool.lock() = Some(pool);
        *self.listener.lock() = Some(running);
        *state = ServerState::Running;
        Ok(())
    }

    /// The address the server is actually bound to, including the port the
    /// OS picked when `new` was given port `0`. Fails with
    /// [`WaypostError::NotStarted`] unless the server is `running`.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .lock()
            .as_ref()
            .map(|running| running.local_addr)
            .ok_or(WaypostError::NotStarted)
    }

    /// Stands up a second listener, sharing the main worker reactor pool,
    /// serving a fixed `/ping` resource. May only be called once; the
    /// main server must already be `running`.
    pub fn start_admin_server(&self, ip: &str, port: u16) -> Result<()> {
        let mut admin_slot = self.admin_listener.lock();
        if admin_slot.is_some() {
            return Err(WaypostError::AlreadyStarted);
        }
        if *self.state.lock() != ServerState::Running {
            return Err(WaypostError::NotStarted);
        }

        let parsed: IpAddr =
            ip.parse().map_err(|_| WaypostError::InvalidAddress(ip.to_string()))?;
        let admin_addr = SocketAddr::new(parsed, port);

        let mut admin_matcher = ResourceMatcher::new();
        admin_matcher
            .register(Arc::new(
                ResourceBuilder::new("/ping")
                    .get(Vec::new(), |_args| Response::text(StatusCode::Ok, "pong\n"))
                    .build(),
            ))
            .expect("admin /ping template never collides");
        let admin_matcher = Arc::new(PRwLock::new(admin_matcher));

        let pool = self.pool.lock().as_ref().ok_or(WaypostError::NotStarted)?.clone();
        let running = spawn_listener(admin_addr, admin_matcher, pool)?;
        debug_log!("admin server listening on {}", running.local_addr);
        *admin_slot = Some(running);
        Ok(())
    }

    /// The address the admin server is actually bound to. Fails with
    /// [`WaypostError::NotStarted`] unless [`Server::start_admin_server`]
    /// has been called successfully.
    pub fn admin_local_addr(&self) -> Result<SocketAddr> {
        self.admin_listener
            .lock()
            .as_ref()
            .map(|running| running.local_addr)
            .ok_or(WaypostError::NotStarted)
    }

    /// Stops accepting connections, halts every reactor, and joins all
    /// threads. Idempotent after the first successful call; fails with
    /// [`WaypostError::NotStarted`] if the server is still `configured`.
    pub fn stop_and_wait(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ServerState::Configured => Err(WaypostError::NotStarted),
            ServerState::Stopped => Ok(()),
            ServerState::Running => {
                if let Some(admin) = self.admin_listener.lock().take() {
                    let _ = admin.listener_shutdown.send(());
                    let _ = admin.listener_thread.join();
                }
                if let Some(listener) = self.listener.lock().take() {
                    let _ = listener.listener_shutdown.send(());
                    let _ = listener.listener_thread.join();
                }
                if let Some(pool) = self.pool.lock().take() {
                    match Arc::try_unwrap(pool) {
                        Ok(pool) => pool.stop_and_join(),
                        Err(_) => {
                            debug_log!("reactor pool still shared at shutdown; leaking threads")
                        }
                    }
                }
                *state = ServerState::Stopped;
                self.stopped_cvar.notify_all();
                Ok(())
            }
        }
    }

    /// Blocks the calling thread until `stopped`; returns immediately if
    /// the server is still `configured`.
    pub fn wait(&self) {
        let mut state = self.state.lock();
        if *state == ServerState::Configured {
            return;
        }
        while *state != ServerState::Stopped {
            self.stopped_cvar.wait(&mut state);
        }
    }
}

/// Binds synchronously (so address errors surface from `start`/
/// `start_admin_server` directly) then spawns a dedicated OS thread
/// running a single-threaded Tokio runtime that accepts forever, handing
/// each connection to the next reactor in `pool`.
fn spawn_listener(
    addr: SocketAddr,
    matcher: Arc<PRwLock<ResourceMatcher>>,
    pool: Arc<ReactorPool>,
) -> Result<RunningListener> {
    let std_listener = std::net::TcpListener::bind(addr).map_err(WaypostError::from)?;
    std_listener.set_nonblocking(true).map_err(WaypostError::from)?;
    let local_addr = std_listener.local_addr().map_err(WaypostError::from)?;

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let listener_thread = std::thread::Builder::new()
        .name("waypost-listener".to_string())
        .spawn(move || {
            let rt = RuntimeBuilder::new_current_thread()
                .enable_all()
                .build()
                .expect("build listener reactor runtime");
            let _guard = rt.enter();
            let listener = match TokioListener::from_std(std_listener) {
                Ok(l) => l,
                Err(err) => {
                    debug_log!("failed to register listener: {}", err);
                    return;
                }
            };
            rt.block_on(async move {
                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        accepted = listener.accept() => {
                            match accepted {
                                Ok((stream, _peer)) => {
                                    let handle = pool.next_handle();
                                    let matcher = matcher.clone();
                                    handle.spawn(async move {
                                        handle_connection(stream, matcher).await;
                                    });
                                }
                                Err(err) => debug_log!("accept failed: {}", err),
                            }
                        }
                    }
                }
            });
        })
        .expect("spawn listener thread");

    Ok(RunningListener { local_addr, listener_shutdown: shutdown_tx, listener_thread })
}
