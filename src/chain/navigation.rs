//! Deterministic navigation along the jobs of a chain.

use super::CEChain;
use crate::time::JobIndex;

impl CEChain {
    /// Immediate forward job chain starting from job `job` of task
    /// `task_index`: one job index per task from `task_index` to the
    /// sink, where each subsequent job is the earliest job of the next
    /// task whose read event occurs at or after the write event of the
    /// current job. Models the earliest possible downstream read of the
    /// produced data.
    pub fn forward_chain(&self, task_index: usize, job: JobIndex) -> Vec<JobIndex> {
        let tasks = self.tasks();
        let mut jobs = Vec::with_capacity(tasks.len() - task_index);
        let mut job = job;
        jobs.push(job);
        for i in task_index..tasks.len() - 1 {
            job = tasks[i + 1].first_read_at_or_after(tasks[i].write_event(job));
            jobs.push(job);
        }
        jobs
    }

    /// Immediate backward job chain ending at job `job` of task
    /// `task_index`: one job index per task from the source up to
    /// `task_index`, where each preceding job is the latest job of the
    /// previous task whose write event occurs at or before the read
    /// event of the current job. Models the latest upstream write
    /// visible to this read.
    ///
    /// A resulting index may be negative, signaling that no valid
    /// upstream job exists; callers at the chain boundary must detect
    /// this and never treat a negative index as a valid job.
    pub fn backward_chain(&self, task_index: usize, job: JobIndex) -> Vec<JobIndex> {
        let tasks = self.tasks();
        let mut jobs = Vec::with_capacity(task_index + 1);
        let mut job = job;
        jobs.push(job);
        for i in (1..=task_index).rev() {
            job = tasks[i - 1].last_write_at_or_before(tasks[i].read_event(job));
            jobs.push(job);
        }
        jobs.reverse();
        jobs
    }

    /// The partitioned job chain through the gap between jobs `job` and
    /// `job + 1` of task `task_index`: the backward half ends at `job`,
    /// the forward half starts at `job + 1`.
    pub fn partitioned_chain(
        &self,
        task_index: usize,
        job: JobIndex,
    ) -> (Vec<JobIndex>, Vec<JobIndex>) {
        (
            self.backward_chain(task_index, job),
            self.forward_chain(task_index, job + 1),
        )
    }
}
