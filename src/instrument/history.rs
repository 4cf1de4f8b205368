//! Call History
//!
//! Records the inputs and outputs of an operation into two parallel lists in
//! the backing store and replays them on demand.
//!
//! # Ordering
//!
//! The input is appended before the wrapped call runs and the output only
//! after it succeeds, so every attempted call leaves an input behind. A failed
//! call leaves the lists one apart from then on. Concurrent calls to the same
//! operation may also interleave their appends. In both cases replay output
//! is approximate.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{call_count, CallArgs, Operation};
use crate::error::Result;
use crate::store::KeyValueStore;

/// List key holding rendered inputs for `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// List key holding rendered outputs for `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

// == Recorded ==
/// Operation wrapper that appends each call's argument tuple and result to
/// the operation's history lists.
///
/// The input is appended before the inner call, the output only on success.
pub struct Recorded<O> {
    inner: O,
    store: Arc<dyn KeyValueStore>,
}

impl<O: Operation> Recorded<O> {
    pub fn new(inner: O, store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, store }
    }

    /// Returns the wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O> Operation for Recorded<O>
where
    O: Operation,
    O::Input: CallArgs,
    O::Output: fmt::Display,
{
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        let rendered = input.render();
        self.store
            .rpush(&inputs_key(self.name()), rendered.as_bytes())
            .await?;

        let output = self.inner.invoke(input).await?;
        self.store
            .rpush(&outputs_key(self.name()), output.to_string().as_bytes())
            .await?;
        debug!(operation = self.name(), input = %rendered, "recorded call");

        Ok(output)
    }
}

// == Call Record ==
/// One replayable call: rendered arguments and rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

// == Call History ==
/// Snapshot of an operation's counter and recorded calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallHistory {
    pub name: String,
    pub calls: i64,
    pub records: Vec<CallRecord>,
}

impl fmt::Display for CallHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.name, self.calls)?;
        for record in &self.records {
            writeln!(f, "{}(*{}) -> {}", self.name, record.input, record.output)?;
        }
        Ok(())
    }
}

/// Loads the counter and recorded calls for `name`.
///
/// Inputs and outputs are zipped, so if the two lists have diverged only the
/// overlapping prefix is returned.
pub async fn history(store: &dyn KeyValueStore, name: &str) -> Result<CallHistory> {
    let calls = call_count(store, name).await?;
    let inputs = store.lrange(&inputs_key(name), 0, -1).await?;
    let outputs = store.lrange(&outputs_key(name), 0, -1).await?;

    let records = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(input, output)| CallRecord {
            input: String::from_utf8_lossy(input).into_owned(),
            output: String::from_utf8_lossy(output).into_owned(),
        })
        .collect();

    Ok(CallHistory {
        name: name.to_string(),
        calls,
        records,
    })
}

/// Writes the call history for `name` to `out`.
///
/// An empty name does not identify any operation and writes nothing.
pub async fn replay_to<W: Write>(store: &dyn KeyValueStore, name: &str, out: &mut W) -> Result<()> {
    if name.is_empty() {
        return Ok(());
    }
    let history = history(store, name).await?;
    write!(out, "{}", history)?;
    Ok(())
}

/// Prints the call history for `name` to standard output.
pub async fn replay(store: &dyn KeyValueStore, name: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    replay_to(store, name, &mut stdout).await
}
