use futures::StreamExt;
use futures::stream;
use std::future::Future;

/// 以受限并发度执行一组相互独立的异步任务，结果顺序与输入顺序一致
///
/// 所有future在当前任务内轮询，不额外spawn线程或tokio任务。
pub async fn do_parallel_with_limit<F, T>(futures: Vec<F>, max_concurrent: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    stream::iter(futures)
        .buffered(max_concurrent.max(1))
        .collect()
        .await
}
