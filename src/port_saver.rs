use rocket::fairing::Info;
use rocket::{Orbit, Rocket};
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::{oneshot, Mutex};

/// Creates a fairing that reports the port Rocket actually bound to, which
/// differs from the configured one when the configuration asks for port 0.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = oneshot::channel();
    let port_saver = PortSaver {
        sender: Mutex::new(Some(tx)),
    };
    let port = Port { rx };
    (port_saver, port)
}

pub struct Port {
    rx: oneshot::Receiver<u16>,
}

impl Port {
    /// Waits for liftoff. Fails if the server was dropped before it bound.
    pub async fn get(self) -> Result<u16, RecvError> {
        self.rx.await
    }
}

pub struct PortSaver {
    sender: Mutex<Option<oneshot::Sender<u16>>>,
}

#[rocket::async_trait]
impl rocket::fairing::Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: rocket::fairing::Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        if let Some(sender) = self.sender.lock().await.take() {
            if sender.send(port).is_err() {
                tracing::debug!(port, "Nobody is waiting for the bound port.");
            }
        }
    }
}
