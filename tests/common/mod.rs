#![allow(dead_code)]

use std::os::fd::BorrowedFd;

use dpi::PhysicalSize;
use shm_present::engine::Compositor;
use shm_present::engine::compositor::BufferLayout;
use shm_present::engine::shell::{ShellKind, ShellRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreatePool { byte_size: i32 },
    CreateBuffer { id: u64, slot: usize, layout: BufferLayout },
    DestroyBuffer { id: u64 },
    DestroyPool { id: u64 },
    Attach { id: u64 },
    Damage { size: PhysicalSize<u32> },
    Commit,
    RequestFrame { token: u64 },
    ReleaseFrame { token: u64 },
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockBuffer {
    pub id: u64,
    pub slot: usize,
    pub layout: BufferLayout,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockPool {
    pub id: u64,
    pub byte_size: i32,
}

#[derive(Debug, Default)]
pub struct MockCompositor {
    pub calls: Vec<Call>,
    pub refuse_buffers: bool,
    next_id: u64,
    outstanding_tokens: Vec<u64>,
}

impl MockCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn outstanding_tokens(&self) -> &[u64] {
        &self.outstanding_tokens
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }

    pub fn created_buffers(&self) -> Vec<(u64, usize, BufferLayout)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateBuffer { id, slot, layout } => Some((*id, *slot, *layout)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Compositor for MockCompositor {
    type Pool = MockPool;
    type Buffer = MockBuffer;
    type FrameToken = u64;

    fn create_pool(&mut self, _fd: BorrowedFd<'_>, byte_size: i32) -> MockPool {
        self.calls.push(Call::CreatePool { byte_size });
        MockPool {
            id: self.next_id(),
            byte_size,
        }
    }

    fn create_buffer(
        &mut self,
        _pool: &MockPool,
        slot: usize,
        layout: BufferLayout,
    ) -> Option<MockBuffer> {
        if self.refuse_buffers {
            return None;
        }
        let id = self.next_id();
        self.calls.push(Call::CreateBuffer { id, slot, layout });
        Some(MockBuffer { id, slot, layout })
    }

    fn destroy_buffer(&mut self, buffer: MockBuffer) {
        self.calls.push(Call::DestroyBuffer { id: buffer.id });
    }

    fn destroy_pool(&mut self, pool: MockPool) {
        self.calls.push(Call::DestroyPool { id: pool.id });
    }

    fn attach(&mut self, buffer: &MockBuffer) {
        self.calls.push(Call::Attach { id: buffer.id });
    }

    fn damage(&mut self, size: PhysicalSize<u32>) {
        self.calls.push(Call::Damage { size });
    }

    fn commit(&mut self) {
        self.calls.push(Call::Commit);
    }

    fn request_frame(&mut self) -> u64 {
        let token = self.next_id();
        self.outstanding_tokens.push(token);
        self.calls.push(Call::RequestFrame { token });
        token
    }

    fn release_frame(&mut self, token: u64) {
        self.outstanding_tokens.retain(|outstanding| *outstanding != token);
        self.calls.push(Call::ReleaseFrame { token });
    }
}

#[derive(Debug)]
pub struct MockShell {
    pub kind: ShellKind,
    pub pongs: Vec<u32>,
}

impl MockShell {
    pub fn new(kind: ShellKind) -> Self {
        Self {
            kind,
            pongs: Vec::new(),
        }
    }
}

impl ShellRole for MockShell {
    fn kind(&self) -> ShellKind {
        self.kind
    }

    fn pong(&mut self, serial: u32) {
        self.pongs.push(serial);
    }
}
