#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::{TempDir, tempdir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const QUOTES_CSV: &str = "\
Fecha y hora,Descripción del Producto - Resumida,Nombre del Proveedor,Marca del Componente,Modelo del Componente,Tipo de Componente,Material,Diámetro,Precio Unitario Neto en CLP,Cantidad,Precio Total Neto en CLP,Plazo de entrega,Link Imagen,Link archivo PDF,Nombre del archivo,Tipo de item
15-01-2024 10:30,\"Rodamiento 6205, sellado\",ACME,SKF,6205-2RS,Rodamiento,Acero,52 mm,18500,4,74000,3 días,,No aplica,cot-001.pdf,Componente
20-02-2025 09:00,Válvula de bola,Hidráulica Sur,Genebre,2528,Válvula,Inoxidable,2 pulgadas,96400,2,192800,1 semana,https://example.com/v.jpg,https://example.com/v.pdf,cot-002.pdf,Componente
03-03-2025 16:45,Motor trifásico,ACME,WEG,W22,Motor,No aplica,No aplica,612000,1,612000,15 días,,,cot-003.pdf,Componente
11-04-2024 11:15,Alineamiento láser,Servicios Integrales,No aplica,No aplica,Mantención,No aplica,No aplica,consultar,1,,A coordinar,,,cot-004.pdf,Servicio
";

pub const EVENTS_CSV: &str = "\
Fecha,Hora,Tipo de evento,Ubicación,Descripción del problema,Responsable,Estado,Prioridad,Tiempo estimado (horas),Tiempo real (horas),Descripción de la solución,Materiales utilizados,Costo estimado,Costo real,Observaciones,Registro evento 1,Registro evento 2,Registro evento 3,Registro solución 1,Registro solución 2,Registro solución 3
05-01-2025,08:00,Orden de Trabajo,Planta 1,Fuga de aceite,Juan Soto,Completado,Baja,4,3,Cambio de sello,Sello,150000,135000,,https://drive.google.com/file/d/before1/view,,,https://x.test/after.mp4,,
12-01-2025,10:30,Tarjeta de Seguridad,Bodega,Estante dañado,Ana Rojas,En Progreso,Crítica,8,0,Refuerzo,,300000,0,,,,,,,
20-01-2025,14:00,Orden de Trabajo,Oficinas,Aire acondicionado,Juan Soto,Pendiente,Media,6,0,Limpieza,,80000,0,,,,,,,
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

/// What the throwaway HTTP responder does with each request.
#[derive(Clone, Debug)]
pub enum Reply {
    Csv(String),
    Status(u16),
    /// Accept the connection and never answer.
    Hang,
    /// Answer with CSV after a delay.
    Delayed(Duration, String),
}

/// Serves `reply` on an ephemeral localhost port and returns the URL.
pub async fn serve(reply: Reply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let reply = reply.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let (status, body) = match reply {
                    Reply::Csv(body) => (200, body),
                    Reply::Status(code) => (code, "error".to_string()),
                    Reply::Hang => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        return;
                    }
                    Reply::Delayed(delay, body) => {
                        tokio::time::sleep(delay).await;
                        (200, body)
                    }
                };
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: text/csv; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}/pub?output=csv")
}

/// A localhost URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}/pub?output=csv")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
