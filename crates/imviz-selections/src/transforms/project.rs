//! Projection transform
//!
//! Resolves a selection's projection into its canonical form: an ordered
//! list of channel/field entries. Channel lists are resolved through the
//! owning scope's encoding; field lists pass through with no channel.

use crate::error::{CompileError, CompileResult};
use crate::scope::Scope;
use crate::selection::{Projection, ProjectionEntry, Selection};
use crate::transforms::{SelectionTransform, TransformKey};

pub struct Project;

impl SelectionTransform for Project {
    fn key(&self) -> TransformKey {
        TransformKey::Project
    }

    fn parse(&self, scope: &dyn Scope, sel: &mut Selection) -> CompileResult<()> {
        let entries = match &sel.project {
            Projection::Channels { channels } => {
                let mut entries = Vec::with_capacity(channels.len());
                for &channel in channels {
                    let field = scope
                        .field(channel)
                        .ok_or(CompileError::MissingChannel { channel })?;
                    entries.push(ProjectionEntry {
                        channel: Some(channel),
                        field,
                    });
                }
                entries
            }
            Projection::Fields { fields } => fields
                .iter()
                .map(|field| ProjectionEntry {
                    channel: None,
                    field: field.clone(),
                })
                .collect(),
            Projection::Entries(_) => return Ok(()),
        };

        sel.project = Projection::Entries(entries);
        Ok(())
    }
}
