// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed SQL for each table. Every function takes `&Database` and runs on the
//! single writer thread.

pub mod channels;
pub mod inbound;
pub mod outbound;
