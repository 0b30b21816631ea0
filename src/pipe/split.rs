//! Lazy iterator over the pipes produced by a split.

use std::iter::FusedIterator;

use crate::metadata::Metadata;

use super::Pipe;

/// The child pipes produced by [`Pipe::split`] or [`Pipe::split_pipe`].
///
/// Children are converted and yielded one at a time, in exactly the order
/// the splitter returned them. Each child inherits the parent's metadata for
/// keys it does not set itself.
///
/// The iterator is finite and forward-only.
pub struct Split<I> {
    children: I,
    parent: Metadata,
}

impl<I> Split<I> {
    pub(crate) fn new(children: I, parent: Metadata) -> Self {
        Self { children, parent }
    }

    /// Returns the metadata each child inherits.
    pub fn parent_metadata(&self) -> &Metadata {
        &self.parent
    }
}

impl<I> Iterator for Split<I>
where
    I: Iterator,
    I::Item: Into<Pipe>,
{
    type Item = Pipe;

    fn next(&mut self) -> Option<Self::Item> {
        let mut child: Pipe = self.children.next()?.into();
        child.metadata_mut().inherit(&self.parent);
        Some(child)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl<I> ExactSizeIterator for Split<I>
where
    I: ExactSizeIterator,
    I::Item: Into<Pipe>,
{
}

impl<I> FusedIterator for Split<I>
where
    I: FusedIterator,
    I::Item: Into<Pipe>,
{
}
