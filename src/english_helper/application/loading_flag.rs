use std::sync::atomic::{AtomicBool, Ordering};

/// 送信中フラグ。同時に一つの送信だけを通す
#[derive(Debug, Default)]
pub struct LoadingFlag(AtomicBool);

/// Clears the flag when dropped, whether the submission succeeded or not.
#[derive(Debug)]
pub struct LoadingGuard<'a>(&'a AtomicBool);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<LoadingGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard(&self.0))
    }

    #[cfg(test)]
    pub(crate) fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
