#[macro_export]
/// Logs a formatted line through the process-wide [`GlobalLogger`](crate::GlobalLogger).
///
/// Evaluates to `false` when the engine's queue was full and the line was
/// dropped.
macro_rules! glog {
    ($($arg:tt)*) => {
        $crate::GlobalLogger::log(format!($($arg)*))
    };
}

#[cfg(feature = "metrics")]
macro_rules! metrics {
    { $( $tt:tt )* } => { $( $tt )* }
}

#[cfg(not(feature = "metrics"))]
macro_rules! metrics {
    { $( $tt:tt)* } => {}
}
