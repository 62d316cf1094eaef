/// Every user-facing message of the application.
///
/// Text lives in `display.rs`; variants carry the values that get interpolated.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleWorksnaps,
    ConfigInvalidInterval,
    ConfigInvalidTargetHours(f64),
    NotConfigured,

    // === PROMPTS ===
    PromptApiToken,
    PromptReplaceToken,
    PromptApiUrl,
    PromptProjectId,
    PromptUserId,
    PromptRefreshInterval,
    PromptTargetHours,
    PromptPrefix,
    PromptShowTime,
    PromptShowRemaining,
    PromptShowActivity,

    // === STATUS MESSAGES ===
    RefreshFailed(String), // error

    // === WATCH MESSAGES ===
    WatchStarted(u64), // refresh interval in seconds
    WatchStopped,
    WatchReceivedSigterm,
    WatchReceivedSigint,
    WatchReceivedCtrlC,
    WatchManualRefresh,
    WatchReloadingConfig,
    WatchConfigUnchanged,
    WatchApiUrlRequiresRestart,
    WatchConfigReloadFailed(String), // error
    WatchSignalHandlerFailed(String), // error
    WatchSignalHandlingNotSupported,
}
