// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::IngestionBatch;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// 队列已满
    #[error("Ingestion queue is full")]
    Full,

    /// 消费端已退出
    #[error("Ingestion queue is closed")]
    Closed,
}

/// 一次待入库的回调数据
#[derive(Debug, Clone)]
pub struct IngestionJob {
    /// 关联的爬取任务，入库完成后回写计数
    pub task_id: Option<Uuid>,
    pub batch: IngestionBatch,
}

/// 入库队列特质
pub trait IngestionQueue: Send + Sync {
    /// 非阻塞入队，队列满时立即返回错误
    fn enqueue(&self, job: IngestionJob) -> Result<(), QueueError>;
}

/// 基于 tokio 有界通道的入库队列
#[derive(Clone)]
pub struct ChannelIngestionQueue {
    sender: Sender<IngestionJob>,
}

impl ChannelIngestionQueue {
    /// 创建队列，返回发送端和供工作器消费的接收端
    ///
    /// # 参数
    ///
    /// * `capacity` - 通道容量，最小为 1
    pub fn new(capacity: usize) -> (Self, Receiver<IngestionJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl IngestionQueue for ChannelIngestionQueue {
    fn enqueue(&self, job: IngestionJob) -> Result<(), QueueError> {
        self.sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full,
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job() -> IngestionJob {
        IngestionJob {
            task_id: None,
            batch: IngestionBatch::classify(json!([])),
        }
    }

    #[tokio::test]
    async fn test_full_queue_rejects_job() {
        let (queue, mut receiver) = ChannelIngestionQueue::new(1);

        assert!(queue.enqueue(job()).is_ok());
        assert_eq!(queue.enqueue(job()).unwrap_err(), QueueError::Full);

        assert!(receiver.recv().await.is_some());
        assert!(queue.enqueue(job()).is_ok());
    }

    #[tokio::test]
    async fn test_dropped_receiver_closes_queue() {
        let (queue, receiver) = ChannelIngestionQueue::new(4);
        drop(receiver);

        assert_eq!(queue.enqueue(job()).unwrap_err(), QueueError::Closed);
    }
}
