//! 挂起请求计数器
//!
//! 进程内唯一的计数器，只有拦截管线可以写入（写方法为 crate 私有）；
//! 加载指示器通过 [`PendingRequestsView`] 只读访问并订阅变化。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listener = Rc<dyn Fn(usize)>;

#[derive(Default)]
struct Inner {
    count: Cell<usize>,
    listeners: RefCell<Vec<Listener>>,
}

impl Inner {
    /// 先复制监听器列表再逐个调用，回调内可以继续订阅
    fn notify(&self) {
        let count = self.count.get();
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(count);
        }
    }
}

/// 挂起请求计数器（写端）
#[derive(Clone, Default)]
pub struct PendingRequests {
    inner: Rc<Inner>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.inner.count.get()
    }

    /// 只读视图，交给加载指示器使用
    pub fn view(&self) -> PendingRequestsView {
        PendingRequestsView {
            inner: self.inner.clone(),
        }
    }

    pub(crate) fn increment(&self) {
        self.inner.count.set(self.inner.count.get() + 1);
        self.inner.notify();
    }

    /// 计数为 0 时跳过，返回是否实际递减
    pub(crate) fn decrement(&self) -> bool {
        let count = self.inner.count.get();
        if count == 0 {
            return false;
        }
        self.inner.count.set(count - 1);
        self.inner.notify();
        true
    }
}

/// 挂起请求计数器（只读端）
#[derive(Clone)]
pub struct PendingRequestsView {
    inner: Rc<Inner>,
}

impl PendingRequestsView {
    pub fn count(&self) -> usize {
        self.inner.count.get()
    }

    pub fn is_busy(&self) -> bool {
        self.count() > 0
    }

    /// 注册变化回调，每次计数改变后以新值调用
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(usize) + 'static,
    {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }
}
