//! Constantes del núcleo.

/// Minutos laborables por día usados para convertir la suma de tiempos
/// estimados de los pasos en días hábiles al calcular la fecha límite.
pub const WORKING_MINUTES_PER_DAY: u32 = 480;

/// Versión del esquema de snapshots. Se estampa en cada snapshot para que
/// lectores futuros puedan distinguir formatos si el shape cambia.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0";
