pub(crate) mod list_review_queue;
pub(crate) mod reassign_reviewer;

pub use list_review_queue::ListReviewQueueInterface;
pub use reassign_reviewer::{ReassignReviewerInterface, ReassignedReviewer};

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    list_review_queue::MockListReviewQueueInterface,
    reassign_reviewer::MockReassignReviewerInterface,
};
