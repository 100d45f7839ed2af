/// Browser-side view counter.
///
/// Each `.view-counter[data-slug]` element is one view session. The
/// `data-state` attribute is set before the request goes out, so a second
/// initialization of the same element sends nothing. Failures leave the
/// placeholder in place; responses for elements already removed from the
/// page are ignored.
pub fn generate_view_counter_js() -> &'static str {
    r#"(function () {
  'use strict';

  var script = document.currentScript;
  var endpoint = ((script && script.dataset.endpoint) || '').replace(/\/+$/, '');
  var PLACEHOLDER = '-';

  function format(count) {
    return String(count).replace(/\B(?=(\d{3})+(?!\d))/g, ',');
  }

  function activate(el) {
    if (el.dataset.state) {
      return;
    }
    el.dataset.state = 'loading';

    var increment = el.dataset.increment === 'true';
    var url = endpoint + '/views/' + encodeURIComponent(el.dataset.slug);

    fetch(url, { method: increment ? 'POST' : 'GET' })
      .then(function (response) {
        if (!response.ok) {
          throw new Error('HTTP ' + response.status);
        }
        return response.json();
      })
      .then(function (body) {
        if (typeof body.count !== 'number') {
          throw new Error('malformed response');
        }
        if (!el.isConnected) {
          return;
        }
        el.dataset.state = 'ready';
        el.textContent = format(body.count);
      })
      .catch(function () {
        if (!el.isConnected) {
          return;
        }
        el.dataset.state = 'error';
        el.textContent = PLACEHOLDER;
      });
  }

  function init() {
    document.querySelectorAll('.view-counter[data-slug]').forEach(activate);
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', init);
  } else {
    init();
  }
})();
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_guards_reactivation() {
        let js = generate_view_counter_js();
        assert!(js.contains("if (el.dataset.state)"));
        assert!(js.contains("'/views/'"));
        assert!(js.contains("increment ? 'POST' : 'GET'"));
    }
}
