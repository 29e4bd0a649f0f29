//! Sequencing of a process's direct children.

use procession_core::model::{BusinessProcess, Interface, InternalActivity};

/// Hands out sequence numbers to items that carry none.
///
/// One counter is shared by the whole traversal, so implicit numbers keep
/// growing across sibling and nested processes.
#[derive(Debug)]
pub(crate) struct SequenceCounter {
    next: u32,
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SequenceCounter {
    /// Returns `explicit` when it is set and non-zero, otherwise the next
    /// counter value.
    pub(crate) fn assign(&mut self, explicit: Option<u32>) -> u32 {
        match explicit {
            Some(number) if number > 0 => number,
            _ => {
                let number = self.next;
                self.next = self.next.saturating_add(1);
                number
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Item<'a> {
    Activity(&'a InternalActivity),
    Interface(&'a Interface),
    Child(&'a BusinessProcess),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SequencedItem<'a> {
    pub(crate) sequence_number: u32,
    pub(crate) item: Item<'a>,
}

/// Merges the activities, interfaces and (optionally) child processes of
/// `process` and orders them by sequence number.
///
/// The sort is stable: items with equal numbers keep merge order.
pub(crate) fn sequenced_items<'a>(
    process: &'a BusinessProcess,
    include_children: bool,
    counter: &mut SequenceCounter,
) -> Vec<SequencedItem<'a>> {
    let mut items = Vec::with_capacity(
        process.internal_activities.len()
            + process.interfaces.len()
            + if include_children {
                process.child_processes.len()
            } else {
                0
            },
    );

    for activity in &process.internal_activities {
        items.push(SequencedItem {
            sequence_number: counter.assign(activity.sequence_number),
            item: Item::Activity(activity),
        });
    }
    for interface in &process.interfaces {
        items.push(SequencedItem {
            sequence_number: counter.assign(interface.sequence_number),
            item: Item::Interface(interface),
        });
    }
    if include_children {
        for child in &process.child_processes {
            items.push(SequencedItem {
                sequence_number: counter.assign(child.sequence_number),
                item: Item::Child(child),
            });
        }
    }

    items.sort_by_key(|item| item.sequence_number);
    items
}
